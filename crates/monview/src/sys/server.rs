use super::http::{HttpError, Method, Request, Response, Status, read_request};
use super::sessions::{Session, SessionId, SessionRegistry};
use crate::config::{self, Config};
use crate::controller::{Controller, SetupId};
use crate::events::ViewEvent;
use crate::page;
use crate::view::{PlotScale, ThemeColors, render_plot};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};

pub const SESSION_HEADER: &str = "x-monview-session";

/// State shared by every connection.
pub struct AppState {
    config: RwLock<Config>,
    config_path: Option<PathBuf>,
    sessions: SessionRegistry,
    colors: ThemeColors,
}

impl AppState {
    pub fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config: RwLock::new(config),
            config_path,
            sessions: SessionRegistry::new(),
            colors: ThemeColors::default(),
        }
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Re-reads the config file. Server settings stay as they were at
    /// startup; everything else reaches new and live sessions.
    pub fn reload(&self) {
        let mut config = config::load_or_default(self.config_path.as_deref());
        config.server = self.config.read().server.clone();
        self.sessions.reconfigure(&config);
        *self.config.write() = config;
        log::info!("Configuration reloaded");
    }

    pub fn sweep(&self) -> usize {
        let timeout = Duration::from_secs(self.config.read().server.session_timeout_secs);
        self.sessions.sweep(timeout)
    }
}

pub async fn run_server(listener: TcpListener, app: Arc<AppState>) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let app = app.clone();
                tokio::spawn(async move {
                    if let Err(e) = serve_connection(stream, &app).await {
                        log::debug!("Connection from {} failed: {}", peer, e);
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}

async fn serve_connection(mut stream: TcpStream, app: &AppState) -> Result<(), HttpError> {
    let (read, mut write) = stream.split();
    let mut reader = BufReader::new(read);

    let (response, method) = match read_request(&mut reader).await {
        Ok(request) => (route(app, &request), Some(request.method)),
        Err(HttpError::ConnectionClosed) => return Ok(()),
        Err(HttpError::TooLarge) => (
            Response::text(Status::PayloadTooLarge, "request too large"),
            None,
        ),
        Err(HttpError::UnsupportedMethod(m)) => (
            Response::text(Status::MethodNotAllowed, &format!("{m} not allowed")),
            None,
        ),
        Err(e) => (Response::text(Status::BadRequest, &e.to_string()), None),
    };

    response.write_to(&mut write, method).await?;
    Ok(())
}

/// Maps one request onto the application.
pub fn route(app: &AppState, request: &Request) -> Response {
    log::debug!("{} {}", request.method, request.path);
    let path = request.path.as_str();

    match (request.method, path) {
        (Method::Get, "/") => index(app),
        // same headers as GET, without registering a session
        (Method::Head, "/") => Response::html(page::render_shell(
            "",
            &Controller::new(&app.config()),
        )),
        (Method::Get | Method::Head, "/view") => with_session(app, request, |id, session| {
            Response::html(page::render_view(id.as_str(), &session.controller()))
        }),
        (Method::Post, "/event") => with_session(app, request, |id, session| {
            handle_event(id, session, &request.body)
        }),
        (Method::Post, "/close") => match request_session(request) {
            Some(id) => {
                app.sessions.close(&id);
                Response::empty(Status::NoContent)
            }
            None => Response::text(Status::BadRequest, "missing session"),
        },
        (Method::Get | Method::Head, _) if path.starts_with("/plot/") => {
            with_session(app, request, |_, session| {
                plot(app, session, &path["/plot/".len()..])
            })
        }
        (_, "/" | "/view" | "/event" | "/close") => {
            Response::text(Status::MethodNotAllowed, "method not allowed")
        }
        _ => Response::text(Status::NotFound, "not found"),
    }
}

fn request_session(request: &Request) -> Option<SessionId> {
    request
        .header(SESSION_HEADER)
        .or_else(|| request.query("session"))
        .and_then(SessionId::parse)
}

fn with_session(
    app: &AppState,
    request: &Request,
    handler: impl FnOnce(&SessionId, &Session) -> Response,
) -> Response {
    let Some(id) = request_session(request) else {
        return Response::text(Status::BadRequest, "missing session");
    };
    match app.sessions.get(&id) {
        Some(session) => handler(&id, &session),
        None => Response::text(Status::NotFound, "unknown or expired session"),
    }
}

fn index(app: &AppState) -> Response {
    let (id, session) = app.sessions.open(&app.config());
    Response::html(page::render_shell(id.as_str(), &session.controller()))
}

fn handle_event(id: &SessionId, session: &Session, body: &[u8]) -> Response {
    let mut controller = session.controller();
    match serde_json::from_slice::<ViewEvent>(body) {
        // rejected edits are kept in the controller and shown on the page
        Ok(event) => {
            let _ = controller.handle(event);
        }
        Err(e) => controller.reject_malformed(e.to_string()),
    }
    Response::html(page::render_view(id.as_str(), &controller))
}

fn plot(app: &AppState, session: &Session, name: &str) -> Response {
    let Some(setup) = name
        .strip_suffix(".svg")
        .and_then(|index| index.parse::<usize>().ok())
        .map(SetupId::new)
    else {
        return Response::text(Status::NotFound, "not found");
    };

    let controller = session.controller();
    let Some(data) = controller.plot(setup) else {
        return Response::text(Status::NotFound, "no such setup");
    };
    let scale = PlotScale::shared(controller.plots());
    match render_plot(data, &scale, controller.plot_config(), &app.colors) {
        Ok(svg) => Response::svg(svg),
        Err(e) => {
            log::error!("Failed to render {}: {}", data.label, e);
            Response::text(Status::InternalServerError, "could not draw the plot")
        }
    }
}
