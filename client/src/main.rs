//! `lms-client` command-line front end.
//!
//! Each invocation restores the persisted session, runs one command through
//! the library services, and prints a short plain-text result.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use lms_client::domain::ids::CourseId;
use lms_client::domain::media::{FileUpload, UploadKind};
use lms_client::{ClientSettings, LmsClient};

/// `lms-client` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "lms-client",
    about = "Talk to the LMS GraphQL API from the terminal",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and persist the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account and persist the session.
    Register {
        #[arg(long = "first-name")]
        first_name: String,
        #[arg(long = "last-name")]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the persisted session.
    Logout,
    /// Show who is signed in.
    Whoami,
    /// List the sections of a course.
    Sections {
        #[arg(value_name = "course-id")]
        course_id: i64,
    },
    /// Show one course.
    Course {
        #[arg(value_name = "course-id")]
        course_id: i64,
    },
    /// Upload a file to the media library.
    Upload {
        path: PathBuf,
        #[arg(long, default_value = "RESOURCE")]
        kind: UploadKind,
    },
    /// Show progress through a course.
    Progress {
        #[arg(value_name = "course-id")]
        course_id: i64,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    // Settings come from the config file and `LMS_*` variables only; the
    // command line belongs to the subcommands.
    let settings = ClientSettings::load_from_iter([OsString::from("lms-client")])
        .map_err(|error| eyre!("load settings: {error}"))?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args.command, &settings))
}

async fn run(command: Command, settings: &ClientSettings) -> Result<()> {
    let client = LmsClient::from_settings(settings)?;
    if let Err(error) = client.initialize() {
        warn!(error = %error, "continuing without a stored session");
    }

    match command {
        Command::Login { email, password } => {
            let payload = client
                .track(client.sessions().login(&email, &password))
                .await?;
            let name = payload
                .user
                .as_ref()
                .map_or_else(|| email.clone(), |user| user.display_name());
            println!("signed in as {name}");
        }
        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            client
                .track(
                    client
                        .sessions()
                        .register(&first_name, &last_name, &email, &password),
                )
                .await?;
            println!("account created for {email}");
        }
        Command::Logout => {
            client.sessions().logout()?;
            println!("signed out");
        }
        Command::Whoami => match client.auth().current_user() {
            Some(user) => println!("{} <{}>", user.display_name(), user.email),
            None if client.auth().is_authenticated() => println!("signed in"),
            None => println!("not signed in"),
        },
        Command::Sections { course_id } => {
            let sections = client
                .track(client.sections().course_sections(CourseId::new(course_id)))
                .await?;
            for section in sections {
                println!(
                    "{order:>3}. {title} (#{id}, {lectures} lectures)",
                    order = section.order,
                    title = section.title,
                    id = section.id,
                    lectures = section.lectures.len()
                );
            }
        }
        Command::Course { course_id } => {
            let course = client
                .track(client.courses().course(CourseId::new(course_id)))
                .await?
                .ok_or_else(|| eyre!("course {course_id} not found"))?;
            println!("#{} {}", course.id, course.title);
            if let Some(subtitle) = course.subtitle {
                println!("{subtitle}");
            }
            if let Some(status) = course.status {
                println!("status: {status:?}");
            }
        }
        Command::Upload { path, kind } => {
            let file = read_upload(&path)?;
            let result = client
                .track(client.uploads().upload_file(file, kind))
                .await?;
            println!("{}", result.url.unwrap_or_else(|| "uploaded".to_owned()));
        }
        Command::Progress { course_id } => {
            let progress = client
                .track(client.course_progress().course_progress(CourseId::new(course_id)))
                .await?
                .ok_or_else(|| eyre!("no progress recorded for course {course_id}"))?;
            println!(
                "{}/{} lectures ({:.0}%)",
                progress.completed_lectures, progress.total_lectures, progress.percentage
            );
        }
    }
    Ok(())
}

fn read_upload(path: &Path) -> Result<FileUpload> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("upload path must name a file"))?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())
        .wrap_err_with(|| format!("open directory '{}'", parent.display()))?;
    let mut file = directory
        .open(Path::new(file_name))
        .wrap_err_with(|| format!("open '{}'", path.display()))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .wrap_err_with(|| format!("read '{}'", path.display()))?;
    Ok(FileUpload::new(file_name.to_string_lossy(), bytes))
}
