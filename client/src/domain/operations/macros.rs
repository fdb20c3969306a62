//! Declarative helper for catalog entries.

/// Define a zero-sized catalog entry implementing `Operation`.
///
/// ```rust,ignore
/// define_operation! {
///     /// Remove a section.
///     mutation DeleteSection {
///         variables: SectionRef,
///         output: Acknowledgement,
///         root: "deleteSection",
///         declare: ["sectionId": "Int!"],
///         selection: "(sectionId: $sectionId) { success message }",
///     }
/// }
/// ```
macro_rules! define_operation {
    (@kind query) => {
        $crate::domain::operations::OperationKind::Query
    };
    (@kind mutation) => {
        $crate::domain::operations::OperationKind::Mutation
    };
    (@default) => {
        None
    };
    (@default $default:literal) => {
        Some($default)
    };
    (
        $(#[$meta:meta])*
        $kind:ident $name:ident {
            variables: $vars:ty,
            output: $output:ty,
            root: $root:literal,
            declare: [$($var:literal : $ty:literal $(= $default:literal)?),* $(,)?],
            selection: $selection:literal $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl $crate::domain::operations::Operation for $name {
            type Variables = $vars;
            type Output = $output;

            const KIND: $crate::domain::operations::OperationKind = define_operation!(@kind $kind);
            const NAME: &'static str = stringify!($name);
            const ROOT_FIELD: &'static str = $root;
            const VARIABLES: &'static [$crate::domain::operations::VariableDecl] = &[
                $(
                    $crate::domain::operations::VariableDecl::new(
                        $var,
                        $ty,
                        define_operation!(@default $($default)?),
                    ),
                )*
            ];
            const SELECTION: &'static str = $selection;
        }
    };
}

pub(crate) use define_operation;
