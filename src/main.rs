use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use nova_client::config::Config;
use nova_client::render::{ChatView, TermView};
use nova_client::services::controller::ChatController;
use nova_client::services::debounce::Debouncer;
use nova_client::services::markdown::PlainMarkdown;
use nova_client::services::transport::ApiClient;

enum UiEvent {
    NewChat,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let config = Config::from_env();
    let api = ApiClient::new(&config)?;

    let mut view = TermView::new();
    view.show_welcome();
    println!("Commands: /new /open <id> /chats /clear /retry /quit");
    println!();

    let mut controller = ChatController::new(api, view, PlainMarkdown);
    controller.refresh_sidebar().await;

    // Rapid /new triggers collapse into one allocation attempt.
    let (tx, mut rx) = mpsc::channel::<UiEvent>(8);
    let debouncer = Debouncer::new(config.debounce);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let input = line.trim().to_string();
                match input.as_str() {
                    "" => {}
                    "/quit" | "/q" => break,
                    "/new" => {
                        let tx = tx.clone();
                        debouncer.call(async move {
                            let _ = tx.send(UiEvent::NewChat).await;
                        });
                    }
                    "/chats" => controller.refresh_sidebar().await,
                    "/clear" => controller.clear_history().await,
                    "/retry" => controller.retry_last().await,
                    cmd if cmd.starts_with("/open ") => {
                        let id = cmd["/open ".len()..].trim().to_string();
                        controller.load_chat(&id).await;
                    }
                    _ => controller.send_message(&input).await,
                }
            }
            Some(event) = rx.recv() => {
                match event {
                    UiEvent::NewChat => controller.new_chat().await,
                }
            }
        }
    }

    Ok(())
}
