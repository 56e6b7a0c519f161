use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use gitsearch_core::{
    history_rows, result_view, DurableStore, FetchController, FetchState, HistoryStore, Msg,
    SearchSession,
};
use gitsearch_engine::{ensure_data_dir, EngineHandle, ReqwestFetcher};
use gitsearch_logging::{gs_info, gs_warn};
use log::LevelFilter;

use super::cli::{Cli, Command};
use super::effects::EffectRunner;
use super::logging::{self, LOG_FILENAME};
use super::navigation::Navigator;
use super::persistence::FileStore;
use super::settings::Settings;
use super::ui::render::{render_history, render_result};

const PROMPT: &str = "gitsearch> ";
const INTERACTIVE_HELP: &str = "\
Type a GitHub username to look it up. Commands:
  :more      load the next page of repositories
  :history   list recent searches
  :open N    search the N-th history entry again
  :help      show this text
  :quit      exit
An empty line clears the current result.";

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings_path = cli.config.clone().unwrap_or_else(Settings::default_path);
    let loaded = Settings::load(&settings_path);
    let settings = loaded.as_ref().cloned().unwrap_or_default();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        settings.level()
    };
    let data_dir = settings.data_dir();
    logging::initialize(settings.log_destination, level, &data_dir.join(LOG_FILENAME));
    if let Err(err) = &loaded {
        gs_warn!("Ignoring settings file {:?}: {}", settings_path, err);
    }
    gs_info!("gitsearch starting, data dir {:?}", data_dir);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.command.unwrap_or(Command::Interactive) {
        Command::Config => {
            writeln!(out, "// {}", settings_path.display())?;
            writeln!(out, "{}", settings.to_ron()?)?;
        }
        Command::History { limit } => {
            let history = HistoryStore::open(FileStore::new(data_dir), settings.history_capacity);
            let mut entries = history.retrieve();
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            write_lines(&mut out, &render_history(&history_rows(&entries)))?;
        }
        Command::Search {
            username,
            pages,
            all,
        } => {
            let mut app = build_app(&settings)?;
            app.navigate(&username);
            app.settle();
            if all {
                app.load_all();
            } else {
                app.load_pages(pages.saturating_sub(1));
            }
            write_lines(&mut out, &render_result(&result_view(app.state())))?;
        }
        Command::Interactive => {
            let mut app = build_app(&settings)?;
            let stdin = io::stdin();
            run_interactive(&mut app, stdin.lock(), &mut out)?;
        }
    }
    Ok(())
}

fn build_app(settings: &Settings) -> anyhow::Result<App<FileStore>> {
    let data_dir = settings.data_dir();
    ensure_data_dir(&data_dir)
        .with_context(|| format!("data directory {} is not writable", data_dir.display()))?;
    let fetcher =
        ReqwestFetcher::new(settings.fetch_settings()).context("building the HTTP client")?;
    let engine = EngineHandle::new(Arc::new(fetcher)).context("starting the fetch engine")?;
    let history = HistoryStore::open(FileStore::new(data_dir), settings.history_capacity);
    Ok(App::new(
        history,
        FetchController::new(settings.page_size),
        EffectRunner::new(engine),
        settings.settle_timeout(),
    ))
}

/// Owns the history and the fetch controller; every event goes through a
/// short-lived [`SearchSession`] borrowing both.
pub struct App<S: DurableStore> {
    history: HistoryStore<S>,
    fetch: FetchController,
    runner: EffectRunner,
    navigator: Navigator,
    settle_timeout: Duration,
}

impl<S: DurableStore> App<S> {
    pub fn new(
        history: HistoryStore<S>,
        fetch: FetchController,
        runner: EffectRunner,
        settle_timeout: Duration,
    ) -> Self {
        Self {
            history,
            fetch,
            runner,
            navigator: Navigator::default(),
            settle_timeout,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let effects = SearchSession::new(&mut self.history, &mut self.fetch).update(msg);
        self.runner.enqueue(effects);
    }

    pub fn navigate(&mut self, term: &str) {
        if let Some(msg) = self.navigator.navigate(term) {
            self.dispatch(msg);
        }
    }

    pub fn load_more(&mut self) {
        self.dispatch(Msg::LoadMoreRequested);
    }

    /// Feeds engine completions back until nothing is outstanding for the current
    /// search. Returns false if the engine went quiet for longer than the timeout.
    pub fn settle(&mut self) -> bool {
        while self.fetch.is_busy() {
            match self.runner.next_msg(self.settle_timeout) {
                Some(msg) => self.dispatch(msg),
                None => {
                    gs_warn!("No response within {:?}; giving up", self.settle_timeout);
                    return false;
                }
            }
        }
        true
    }

    pub fn load_pages(&mut self, extra_pages: u32) {
        for _ in 0..extra_pages {
            if !self.load_one_more() {
                break;
            }
        }
    }

    pub fn load_all(&mut self) {
        while self.load_one_more() {}
    }

    /// Loads one further page. False when nothing remains or the page added nothing.
    fn load_one_more(&mut self) -> bool {
        if !self.fetch.has_more() {
            return false;
        }
        let before = self.record_count();
        self.load_more();
        if !self.settle() {
            return false;
        }
        if self.record_count() == before {
            gs_warn!("Page after {} records came back empty; stopping", before);
            return false;
        }
        true
    }

    fn record_count(&self) -> usize {
        self.fetch
            .state()
            .loaded()
            .map_or(0, |data| data.records.len())
    }

    pub fn state(&self) -> &FetchState {
        self.fetch.state()
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }
}

fn run_interactive<S: DurableStore>(
    app: &mut App<S>,
    input: impl BufRead,
    out: &mut impl Write,
) -> io::Result<()> {
    writeln!(out, "{INTERACTIVE_HELP}")?;
    write!(out, "{PROMPT}")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        match line {
            ":quit" | ":q" => break,
            ":help" => writeln!(out, "{INTERACTIVE_HELP}")?,
            ":history" => {
                let rows = history_rows(&app.history().retrieve());
                write_lines(out, &render_history(&rows))?;
            }
            ":more" => {
                app.load_more();
                app.settle();
                write_lines(out, &render_result(&result_view(app.state())))?;
            }
            _ if line.starts_with(":open") => {
                let entries = app.history().retrieve();
                let picked = line[":open".len()..]
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|index| entries.get(index));
                match picked {
                    Some(entry) => {
                        let term = entry.text().to_string();
                        app.navigate(&term);
                        app.settle();
                        write_lines(out, &render_result(&result_view(app.state())))?;
                    }
                    None => writeln!(out, "No such history entry")?,
                }
            }
            _ if line.starts_with(':') => writeln!(out, "Unknown command {line}; try :help")?,
            term => {
                app.navigate(term);
                app.settle();
                write_lines(out, &render_result(&result_view(app.state())))?;
            }
        }
        write!(out, "{PROMPT}")?;
        out.flush()?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use gitsearch_core::{MemoryStore, ResultView};
    use gitsearch_engine::{FailureKind, FetchError, Fetcher, ProfilePayload, RecordPayload};

    /// GitHub stand-in: users map to a repository count; unknown users are 404.
    struct FakeGitHub {
        users: HashMap<String, u32>,
        record_requests: Mutex<Vec<(String, u32, u32)>>,
    }

    impl FakeGitHub {
        fn new(users: &[(&str, u32)]) -> Arc<Self> {
            Arc::new(Self {
                users: users
                    .iter()
                    .map(|(name, count)| (name.to_string(), *count))
                    .collect(),
                record_requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl Fetcher for FakeGitHub {
        async fn fetch_profile(&self, identifier: &str) -> Result<ProfilePayload, FetchError> {
            match self.users.get(identifier) {
                Some(count) => Ok(ProfilePayload {
                    avatar_url: format!("https://avatars.example.com/{identifier}"),
                    name: Some(identifier.to_string()),
                    email: None,
                    bio: None,
                    public_repos: *count,
                }),
                None => Err(FetchError::new(FailureKind::HttpStatus(404), "Not Found")),
            }
        }

        async fn fetch_records(
            &self,
            identifier: &str,
            page: u32,
            per_page: u32,
        ) -> Result<Vec<RecordPayload>, FetchError> {
            self.record_requests
                .lock()
                .unwrap()
                .push((identifier.to_string(), page, per_page));
            let total = self.users.get(identifier).copied().unwrap_or(0);
            let start = (page - 1) * per_page;
            let end = (start + per_page).min(total);
            Ok((start..end)
                .map(|i| RecordPayload {
                    name: format!("{identifier}-repo-{i}"),
                    html_url: format!("https://github.com/{identifier}/repo-{i}"),
                    description: None,
                })
                .collect())
        }
    }

    fn app_with(github: Arc<FakeGitHub>) -> App<MemoryStore> {
        let engine = EngineHandle::new(github).expect("engine");
        App::new(
            HistoryStore::open(MemoryStore::new(), 50),
            FetchController::new(10),
            EffectRunner::new(engine),
            Duration::from_secs(5),
        )
    }

    fn history_texts(app: &App<MemoryStore>) -> Vec<String> {
        app.history()
            .retrieve()
            .iter()
            .map(|entry| entry.text().to_string())
            .collect()
    }

    #[test]
    fn search_settles_with_first_page() {
        let github = FakeGitHub::new(&[("octocat", 25)]);
        let mut app = app_with(github.clone());

        app.navigate("octocat");
        assert!(app.settle());

        let data = app.state().loaded().expect("loaded");
        assert_eq!(data.records.len(), 10);
        assert_eq!(data.cursor, 1);
        assert_eq!(history_texts(&app), vec!["octocat"]);
        assert_eq!(
            *github.record_requests.lock().unwrap(),
            vec![("octocat".to_string(), 1, 10)]
        );
    }

    #[test]
    fn load_all_reaches_total_count() {
        let github = FakeGitHub::new(&[("octocat", 25)]);
        let mut app = app_with(github.clone());
        app.navigate("octocat");
        app.settle();
        app.load_all();

        let data = app.state().loaded().expect("loaded");
        assert_eq!(data.records.len(), 25);
        assert_eq!(data.cursor, 3);
        assert_eq!(github.record_requests.lock().unwrap().len(), 3);
    }

    #[test]
    fn zero_repositories_never_request_records() {
        let github = FakeGitHub::new(&[("empty", 0)]);
        let mut app = app_with(github.clone());
        app.navigate("empty");
        app.settle();

        assert!(app.state().loaded().unwrap().records.is_empty());
        assert!(github.record_requests.lock().unwrap().is_empty());
    }

    #[test]
    fn unknown_user_is_not_found_but_remembered() {
        let mut app = app_with(FakeGitHub::new(&[]));
        app.navigate("ghost");
        app.settle();

        assert_eq!(app.state(), &FetchState::NotFound);
        assert_eq!(history_texts(&app), vec!["ghost"]);
    }

    #[test]
    fn repeated_navigation_to_same_term_does_not_refetch() {
        let github = FakeGitHub::new(&[("octocat", 3)]);
        let mut app = app_with(github.clone());
        app.navigate("octocat");
        app.settle();
        app.navigate("octocat");
        app.settle();

        assert_eq!(github.record_requests.lock().unwrap().len(), 1);
        assert_eq!(app.history().store().writes(), 1);
    }

    #[test]
    fn interactive_session_drives_search_history_and_more() {
        let github = FakeGitHub::new(&[("octocat", 12), ("torvalds", 0)]);
        let mut app = app_with(github);
        let input = "octocat\n:more\ntorvalds\n:history\n:open 2\n\n:bogus\n:quit\nignored\n";
        let mut out = Vec::new();

        run_interactive(&mut app, input.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("More Repos: showing 10 of 12"));
        assert!(text.contains("  12. octocat-repo-11"));
        assert!(text.contains(" 1. torvalds"));
        assert!(text.contains(" 2. octocat"));
        assert!(text.contains("Unknown command :bogus"));
        assert_eq!(history_texts(&app), vec!["octocat", "torvalds"]);
        // The empty line cleared the result after `:open 2`.
        assert_eq!(result_view(app.state()), ResultView::Hidden);
    }
}
