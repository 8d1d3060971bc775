use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use jobsearch_core::{update, AppState, Msg, Phase};
use jobsearch_engine::EngineHandle;
use jobsearch_logging::{search_info, search_warn};

use super::commands::{parse_command, Command, HELP};
use super::config::{AppConfig, LOG_FILENAME};
use super::effects::EffectRunner;
use super::location::LocationBar;
use super::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

pub fn run_app() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("reading working directory")?;
    let (config, config_error) = match AppConfig::load(&cwd) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };
    jobsearch_logging::initialize(
        config.log_destination(),
        config.log_level(),
        &cwd.join(LOG_FILENAME),
    );
    if let Some(err) = config_error {
        search_warn!("Configuration ignored, using defaults: {}", err);
        eprintln!("warning: {err}; using defaults");
    }

    let initial = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.route.clone());
    search_info!("Starting at {} against {}", initial, config.api_base);

    let engine = EngineHandle::new(config.client_settings()).context("starting engine")?;
    let mut session = Session::new(
        AppState::with_tuning(config.tuning()),
        EffectRunner::new(engine),
        LocationBar::new(initial.clone()),
    );
    let commands = spawn_command_reader();

    session.dispatch(Msg::Mount { location: initial });
    let mut stdin_open = true;
    loop {
        if stdin_open {
            loop {
                match commands.try_recv() {
                    Ok(Command::Dispatch(msg)) => session.dispatch(msg),
                    Ok(Command::Show) => session.redraw()?,
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Quit) => {
                        session.dispatch(Msg::Teardown);
                        return Ok(());
                    }
                    Err(mpsc::TryRecvError::Empty) => break,
                    Err(mpsc::TryRecvError::Disconnected) => {
                        stdin_open = false;
                        break;
                    }
                }
            }
        } else if session.runner.is_idle() {
            // Input ended; leave once the last answers are on screen.
            session.render_if_dirty()?;
            break;
        }

        if let Some(msg) = session.runner.poll(POLL_INTERVAL) {
            session.dispatch(msg);
        }
        session.render_if_dirty()?;
    }

    session.dispatch(Msg::Teardown);
    Ok(())
}

/// The single owner of the state; every message goes through `dispatch`.
struct Session {
    state: AppState,
    runner: EffectRunner,
    location: LocationBar,
}

impl Session {
    fn new(state: AppState, runner: EffectRunner, location: LocationBar) -> Self {
        Self {
            state,
            runner,
            location,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects, &mut self.location);
    }

    fn render_if_dirty(&mut self) -> io::Result<()> {
        if self.state.phase() != Phase::Mounted || !self.state.consume_dirty() {
            return Ok(());
        }
        self.redraw()
    }

    fn redraw(&self) -> io::Result<()> {
        let view = self.state.view();
        let mut out = io::stdout().lock();
        writeln!(out)?;
        for line in ui::render::render(&view) {
            writeln!(out, "{line}")?;
        }
        write!(out, "> ")?;
        out.flush()
    }
}

fn spawn_command_reader() -> mpsc::Receiver<Command> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Ok(command) => {
                    if tx.send(command).is_err() {
                        break;
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    use jobsearch_core::{ListingView, SalaryView, Tuning};
    use jobsearch_engine::{FailureKind, FetchError, QueryClient, Scalar};
    use serde_json::{json, Value};

    /// In-memory API answering every read-only endpoint.
    struct CannedApi;

    #[async_trait::async_trait]
    impl QueryClient for CannedApi {
        async fn fetch_json(
            &self,
            path: &str,
            params: &[(String, Option<Scalar>)],
        ) -> Result<Value, FetchError> {
            let q = params
                .iter()
                .find(|(name, _)| name == "q")
                .and_then(|(_, value)| value.as_ref())
                .map(ToString::to_string);
            match path {
                "/api/jobs" => {
                    let title = q.unwrap_or_else(|| "Any".to_string());
                    Ok(json!({
                        "total": 1,
                        "page": 1,
                        "page_size": 20,
                        "items": [{
                            "job_id": "j1",
                            "title": title,
                            "company": "Ferris Inc",
                            "city": "Austin",
                            "created_at": "2024-06-01T12:00:00Z"
                        }]
                    }))
                }
                "/api/cities" => Ok(json!([{ "city": "Austin", "n": 12 }])),
                "/api/skills/rising" => Ok(json!([])),
                "/api/skills/suggest" => Ok(json!(["python", "pytorch"])),
                "/api/metrics/salary_by_skill" => {
                    Ok(json!({ "p25": 90000.0, "median": 120000.0, "p75": 150000.0, "n": 40 }))
                }
                _ => Err(FetchError::new(FailureKind::HttpStatus(404), "Not Found")),
            }
        }
    }

    fn session(location: &str) -> Session {
        let tuning = Tuning {
            text_quiet: Duration::from_millis(30),
            typeahead_quiet: Duration::from_millis(10),
            salary_quiet: Duration::from_millis(10),
            ..Tuning::default()
        };
        let engine = EngineHandle::with_client(Arc::new(CannedApi)).unwrap();
        Session::new(
            AppState::with_tuning(tuning),
            EffectRunner::new(engine),
            LocationBar::new(location),
        )
    }

    fn settle(session: &mut Session) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !session.runner.is_idle() && Instant::now() < deadline {
            if let Some(msg) = session.runner.poll(POLL_INTERVAL) {
                session.dispatch(msg);
            }
        }
        assert!(session.runner.is_idle(), "engine did not settle");
    }

    #[test]
    fn mount_loads_listing_and_cards() {
        let mut session = session("/jobs?skill=python");
        session.dispatch(Msg::Mount {
            location: "/jobs?skill=python".to_string(),
        });
        settle(&mut session);

        let view = session.state.view();
        match view.listing {
            ListingView::Results(results) => assert_eq!(results.rows[0].title, "Any"),
            other => panic!("expected results, got {other:?}"),
        }
        assert_eq!(view.city_options[0].label, "Austin (12)");
        assert_eq!(view.suggestions, vec!["python", "pytorch"]);
        assert!(matches!(view.salary, SalaryView::Figures { ref median, .. } if median == "$120k"));
        assert_eq!(session.location.current(), "/jobs?skill=python");
        assert_eq!(session.location.writes(), 0);
    }

    #[test]
    fn typing_settles_into_one_location_write_and_refetch() {
        let mut session = session("/jobs");
        session.dispatch(Msg::Mount {
            location: "/jobs".to_string(),
        });
        settle(&mut session);

        for prefix in ["d", "da", "dat", "data"] {
            session.dispatch(Msg::TextInput(prefix.to_string()));
        }
        settle(&mut session);

        assert_eq!(session.location.current(), "/jobs?q=data");
        assert_eq!(session.location.writes(), 1);
        match session.state.view().listing {
            ListingView::Results(results) => assert_eq!(results.rows[0].title, "data"),
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn teardown_leaves_the_runner_idle() {
        let mut session = session("/jobs");
        session.dispatch(Msg::Mount {
            location: "/jobs".to_string(),
        });
        session.dispatch(Msg::TextInput("rust".to_string()));
        session.dispatch(Msg::Teardown);
        assert!(session.runner.is_idle());
        assert_eq!(session.state.phase(), Phase::TornDown);
    }
}
