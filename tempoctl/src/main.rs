use anyhow::Result;
use clap::{Parser, Subcommand};
use tempo_ipc::{send_command, Command, Response, TaskState};

#[derive(Parser)]
#[command(name = "tempoctl")]
#[command(about = "Control the tempo task timer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new task
    Start { name: String },
    /// Pause the current task
    Pause,
    /// Resume the current task
    Resume,
    /// Rename the current task
    Rename { name: String },
    /// Complete the current task
    Complete,
    /// Show the current task status
    Status,
    /// List completed tasks
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Start { name } => Command::Start { name },
        Commands::Pause => Command::Pause,
        Commands::Resume => Command::Resume,
        Commands::Rename { name } => Command::Rename { name },
        Commands::Complete => Command::Complete,
        Commands::Status => Command::Status,
        Commands::List => Command::ListCompleted,
    };

    let response = send_command(&command).await?;

    match response {
        Response::Ok => println!("OK"),
        Response::Status(status) => {
            match status.state {
                TaskState::Idle => println!("State: idle"),
                TaskState::Running => println!("State: running"),
                TaskState::Paused => println!("State: paused"),
            }
            if let Some(name) = status.name {
                println!("Task: {}", name);
                println!("Elapsed: {}s", status.elapsed_seconds);
            }
        }
        Response::Completed(tasks) => {
            for task in tasks {
                println!("[{}s] {}", task.duration_seconds, task.name);
            }
        }
        Response::Error(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
