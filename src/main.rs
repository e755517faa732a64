//! resume-chat - terminal client for the resume RAG backend
//!
//! Two independent sessions, one per mode: retrieval-augmented questions
//! about the indexed resume, and direct chat with the backend's LLM.

mod config;
mod render;
mod session;
mod state_machine;
mod suggestions;
mod transport;

use config::{ChatConfig, LogFormat};
use render::SnapshotRenderer;
use session::{SessionController, SessionState, SubmitOutcome};
use state_machine::SessionContext;
use std::io::Write as _;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use transport::{ChatMode, HttpTransport, LoggingTransport, Transport};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type Backend = Arc<LoggingTransport<HttpTransport>>;
type Controller = Arc<SessionController<Backend>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ChatConfig::from_env()?;

    // Logs go to stderr; stdout carries the conversation
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "resume_chat=info".into());
    let (text_layer, json_layer) = match config.log_format {
        LogFormat::Text => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(std::io::stderr),
            ),
        ),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    let backend: Backend = Arc::new(LoggingTransport::new(HttpTransport::new(&config.api_url)?));
    tracing::info!(
        api_url = %backend.base_url(),
        mode = config.default_mode.as_str(),
        "Starting chat client"
    );

    let repl = Repl::new(backend, config.default_mode);
    repl.run().await
}

struct Repl {
    backend: Backend,
    rag: Controller,
    chat: Controller,
    active: watch::Sender<ChatMode>,
}

impl Repl {
    fn new(backend: Backend, mode: ChatMode) -> Self {
        let session = |mode| {
            Arc::new(SessionController::new(
                SessionContext::new(mode),
                Arc::clone(&backend),
            ))
        };
        let rag = session(ChatMode::Rag);
        let chat = session(ChatMode::Direct);
        let (active, _) = watch::channel(mode);

        Self {
            backend,
            rag,
            chat,
            active,
        }
    }

    fn controller(&self, mode: ChatMode) -> &Controller {
        match mode {
            ChatMode::Rag => &self.rag,
            ChatMode::Direct => &self.chat,
        }
    }

    fn active(&self) -> &Controller {
        self.controller(*self.active.borrow())
    }

    async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let view = tokio::spawn(render_loop(
            self.active.subscribe(),
            self.rag.store().subscribe(),
            self.chat.store().subscribe(),
        ));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if !self.handle_line(&line).await {
                break;
            }
        }

        view.abort();
        Ok(())
    }

    /// Returns false when the user asked to quit
    async fn handle_line(&self, line: &str) -> bool {
        let Some(command) = line.trim().strip_prefix('/') else {
            self.spawn_submit(line.to_string());
            return true;
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));

        match name {
            "quit" | "exit" => return false,
            "help" => say(render::help()),
            "mode" => match ChatMode::parse(arg) {
                Some(mode) => {
                    self.active.send_replace(mode);
                }
                None => say("Usage: /mode rag|chat\n"),
            },
            "suggest" => {
                let mode = self.active().mode();
                let list = suggestions::for_mode(mode);
                if list.is_empty() {
                    say("No suggestions in this mode.\n");
                } else {
                    let text: String = list
                        .iter()
                        .enumerate()
                        .map(|(i, q)| format!("  /{} {q}\n", i + 1))
                        .collect();
                    say(&text);
                }
            }
            "dismiss" => self.active().dismiss_error(),
            "health" => self.spawn_admin(AdminCommand::Health),
            "stats" => self.spawn_admin(AdminCommand::Stats),
            "load" if !arg.is_empty() => {
                self.spawn_admin(AdminCommand::LoadPdf(arg.to_string()));
            }
            "load" => say("Usage: /load <path to pdf on the backend>\n"),
            _ => match name.parse::<usize>() {
                Ok(n) if n > 0 => self.spawn_suggestion(n - 1),
                _ => say("Unknown command, try /help\n"),
            },
        }
        true
    }

    /// Submissions run in the background so the prompt stays live; the
    /// controller refuses anything typed while a request is in flight.
    fn spawn_submit(&self, line: String) {
        let controller = Arc::clone(self.active());
        tokio::spawn(async move {
            let outcome = controller.submit_typed(&line).await;
            log_outcome(controller.mode(), &outcome);
        });
    }

    /// Backend admin calls share the conversation deadline, so they run off
    /// the input loop too
    fn spawn_admin(&self, command: AdminCommand) {
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            say(&command.run(backend.inner()).await);
        });
    }

    fn spawn_suggestion(&self, index: usize) {
        let controller = Arc::clone(self.active());
        tokio::spawn(async move {
            match controller.submit_suggestion(index).await {
                Some(outcome) => log_outcome(controller.mode(), &outcome),
                None => say("No such suggestion, try /suggest\n"),
            }
        });
    }
}

enum AdminCommand {
    Health,
    Stats,
    LoadPdf(String),
}

impl AdminCommand {
    async fn run(self, backend: &HttpTransport) -> String {
        let result = match self {
            AdminCommand::Health => backend.health().await.map(|health| {
                format!(
                    "Backend status: {} (RAG initialized: {})\n",
                    health.status, health.rag_initialized
                )
            }),
            AdminCommand::Stats => backend.stats().await.map(|stats| {
                let field = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
                format!(
                    "Status: {}\nModel: {}\nOllama: {}\nDatabase: {}\n",
                    stats.status,
                    field(stats.model),
                    field(stats.ollama_url),
                    field(stats.database_status),
                )
            }),
            AdminCommand::LoadPdf(path) => backend.load_pdf(&path).await.map(|loaded| {
                format!(
                    "{} ({} chunks indexed)\n",
                    loaded.message, loaded.chunks_indexed
                )
            }),
        };

        result.unwrap_or_else(|e| render::banner(&e.display_message()))
    }
}

fn log_outcome(mode: ChatMode, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Answered => tracing::debug!(mode = mode.as_str(), "Submission answered"),
        SubmitOutcome::Failed(e) => {
            tracing::debug!(mode = mode.as_str(), kind = e.kind.as_str(), "Submission failed");
        }
        SubmitOutcome::Skipped(_) => {}
    }
}

/// Prints whatever changed in the active session, replaying the whole log
/// when the user switches sessions
async fn render_loop(
    mut active: watch::Receiver<ChatMode>,
    mut rag: watch::Receiver<Arc<SessionState>>,
    mut chat: watch::Receiver<Arc<SessionState>>,
) {
    let mut mode = *active.borrow_and_update();
    let mut renderer = SnapshotRenderer::new();
    let initial = match mode {
        ChatMode::Rag => Arc::clone(&rag.borrow_and_update()),
        ChatMode::Direct => Arc::clone(&chat.borrow_and_update()),
    };
    say(&renderer.replay(&initial, mode));

    loop {
        tokio::select! {
            changed = active.changed() => {
                if changed.is_err() {
                    break;
                }
                mode = *active.borrow_and_update();
                let state = match mode {
                    ChatMode::Rag => Arc::clone(&rag.borrow_and_update()),
                    ChatMode::Direct => Arc::clone(&chat.borrow_and_update()),
                };
                say(&format!("--- {} ---\n", mode.as_str()));
                say(&renderer.replay(&state, mode));
            }
            changed = rag.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = Arc::clone(&rag.borrow_and_update());
                if mode == ChatMode::Rag {
                    say(&renderer.render(&state));
                }
            }
            changed = chat.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = Arc::clone(&chat.borrow_and_update());
                if mode == ChatMode::Direct {
                    say(&renderer.render(&state));
                }
            }
        }
    }
}

fn say(text: &str) {
    if text.is_empty() {
        return;
    }
    let mut stdout = std::io::stdout().lock();
    // A closed stdout leaves nothing to report to
    let _ = stdout.write_all(text.as_bytes());
    let _ = stdout.flush();
}
