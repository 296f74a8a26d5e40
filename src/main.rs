use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use mimic::kernel::event::Event;
use mimic::media::SimulatedVideo;
use mimic::services::chat::{ChatClient, Conversation};
use mimic::{store, MimicConfig, Reactor};

const DEFAULT_SOURCE: &str = "local://reaction/default.mp4";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = MimicConfig::from_env().context("loading configuration")?;
    let table = store::load_table(config.segments_path.as_deref()).context("loading expression segments")?;
    let labels = table.labels();

    tracing::info!("Mimic booting. Expressions: {:?}", labels);

    let (tx, rx) = mpsc::channel(100);
    let video = SimulatedVideo::new(config.video_duration_secs);
    let mut reactor = Reactor::new(rx, tx.clone(), video, config.clone());

    // Segments first, then the default avatar source (starts on the rest label)
    tx.send(Event::Segments(table)).await?;
    tx.send(Event::AttachSource(DEFAULT_SOURCE.to_string())).await?;

    let shutdown = CancellationToken::new();
    let chat = ChatClient::new(&config.chat_base_url, config.chat_timeout());
    let rest_label = config.rest_label.clone();
    let avatar_description = config.avatar_description.clone();

    // Console input
    let input_shutdown = shutdown.clone();
    tokio::spawn(async move {
        let reader = BufReader::new(tokio::io::stdin());
        let mut lines = reader.lines();
        let mut conversation = match &avatar_description {
            Some(description) => Conversation::new().with_avatar(description),
            None => Conversation::new(),
        };

        println!("Chat with the avatar, or: /label <L>, /pause, /play, /source <url>, /quit");

        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let event = match line.split_once(' ').unwrap_or((line, "")) {
                ("/quit", _) => break,
                ("/label", label) => Event::Express(label.trim().to_string()),
                ("/pause", _) => Event::UserPause,
                ("/play", _) => Event::UserPlay,
                ("/source", url) if !url.trim().is_empty() => Event::AttachSource(url.trim().to_string()),
                _ => match chat.send(&conversation, line, &labels).await {
                    Ok(reply) => {
                        conversation.record(line, &reply);
                        println!("AI: {}", reply.response);
                        println!(
                            "[tokens] {} total ({} prompt + {} completion)",
                            conversation.tokens.total, conversation.tokens.prompt, conversation.tokens.completion
                        );
                        Event::Express(reply.label_or(&rest_label).to_string())
                    }
                    Err(e) => {
                        tracing::warn!("Chat request failed: {}", e);
                        continue;
                    }
                },
            };

            if let Err(e) = tx.send(event).await {
                tracing::error!("Failed to send input: {}", e);
                break;
            }
        }
        input_shutdown.cancel();
    });

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.cancel();
        }
    });

    reactor.run(shutdown).await;

    let snapshot = reactor.controller.telemetry.snapshot();
    tracing::info!(
        "Session over: {} segments played, {} auto returns, {} neutral loops, {} resumes",
        snapshot.sessions_started,
        snapshot.auto_returns,
        snapshot.neutral_loops,
        snapshot.resumes_applied
    );
    Ok(())
}
