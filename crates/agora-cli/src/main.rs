use agora_cli::{Cli, Output};
use agora_core::MessageKind;
use agora_sim::Transcript;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "agora=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match agora_cli::run(cli).await? {
        Output::Text(text) => println!("{text}"),
        Output::Transcripts(transcripts) => {
            for transcript in &transcripts {
                print!("{}", render_transcript(transcript));
            }
        }
    }

    Ok(())
}

fn render_transcript(transcript: &Transcript) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n",
        "room:".bright_green(),
        transcript.room_name.bold()
    ));
    if !transcript.description.is_empty() {
        out.push_str(&format!("{}\n", transcript.description.dimmed()));
    }

    let seated: Vec<String> = transcript
        .participants
        .iter()
        .map(|participant| format!("{} ({})", participant.name, participant.persona))
        .collect();
    out.push_str(&format!("{} {}\n\n", "agents:".bright_green(), seated.join(", ")));

    for message in transcript.messages.iter().filter(|message| message.visible) {
        let speaker = transcript.display_name(&message.sender);
        let speaker = match message.kind {
            MessageKind::User => speaker.bright_blue().bold(),
            MessageKind::Agent => speaker.bright_magenta().bold(),
            MessageKind::System => speaker.yellow().bold(),
        };
        out.push_str(&format!("{speaker}: {}\n", message.body));
    }

    out.push_str(&format!(
        "\n{}\n",
        format!("{} messages", transcript.messages.len()).dimmed()
    ));
    out
}
