use std::io::{self, stdout, Stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use akshar::backend::{HttpTransliterator, TableTransliterator, Transliterator};
use akshar::core::overlay::{EntryStyle, OverlayLayout, OverlayStyle};
use akshar::core::types::TransliterationRequest;
use akshar::dispatch::Dispatcher;
use akshar::logging::init_logging;
use akshar::terminal::{visual_rows, TerminalMeasure};
use akshar::{Completion, Config, DelimiterOutcome, WordSuggestionSession};
use clap::{ArgAction, Parser};
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthStr;

/// First screen row of the text field; rows above hold the title.
const FIELD_TOP: u16 = 2;
const POLL_INTERVAL: Duration = Duration::from_millis(30);
/// Overlay spacing in terminal cells.
const CELL_STYLE: OverlayStyle = OverlayStyle {
    padding: 2.0,
    gap: 0.0,
    row_height: 1.0,
};

#[derive(Parser, Debug)]
#[command(name = "akshar", version, about = "Transliterating text field with word suggestions")]
struct Cli {
    /// Config file (defaults to <data dir>/akshar/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Override the backend endpoint
    #[arg(long)]
    backend_url: Option<String>,
    /// Answer from a JSON word table instead of the backend
    #[arg(long)]
    table: Option<PathBuf>,
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Log file (defaults to <data dir>/akshar/akshar.log, emptied at start)
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Write the effective config to the config path and exit
    #[arg(long)]
    init_config: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("akshar: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> akshar::Result<()> {
    let config_path = cli.config.clone().or_else(Config::default_path);
    let mut config = match &config_path {
        Some(path) => Config::load_or_default(path)?,
        None => Config::default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
    }
    if cli.verbose > 0 {
        config.logging.verbosity = cli.verbose;
    }
    if let Some(path) = &cli.log_file {
        config.logging.file = Some(path.clone());
    }

    if cli.init_config {
        let path = config_path.ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "no data directory for the config file")
        })?;
        config.save(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    // The editor owns the screen, so logs always go to a file. The default
    // file starts empty on every run.
    let truncate = config.logging.file.is_none() || config.logging.truncate;
    if let Some(path) = config.logging.file.clone().or_else(Config::default_log_path) {
        init_logging(config.logging.verbosity, Some(path.as_path()), truncate)?;
    }

    let backend: Box<dyn Transliterator> = match &cli.table {
        Some(path) => {
            let table = TableTransliterator::from_json_file(path)?;
            tracing::info!(path = %path.display(), words = table.len(), "using word table");
            Box::new(table)
        }
        None => {
            let http = HttpTransliterator::from_config(&config.backend)?;
            tracing::info!(endpoint = http.endpoint(), "using transliteration server");
            Box::new(http)
        }
    };

    let dispatcher = Dispatcher::spawn(backend)?;
    let mut app = App::new(WordSuggestionSession::from_config(&config), dispatcher);
    let _guard = TerminalGuard::enter()?;
    let result = app.run();
    tracing::info!("editor closed");
    result
}

/// Restores the terminal however the editor exits.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
    }
}

enum Flow {
    Continue,
    Quit,
}

struct App {
    session: WordSuggestionSession,
    dispatcher: Dispatcher,
    measure: TerminalMeasure,
    screen_rows: u16,
    highlighted: usize,
    status: String,
}

impl App {
    fn new(session: WordSuggestionSession, dispatcher: Dispatcher) -> Self {
        Self {
            session,
            dispatcher,
            measure: TerminalMeasure::default(),
            screen_rows: 0,
            highlighted: 0,
            status: String::new(),
        }
    }

    fn run(&mut self) -> akshar::Result<()> {
        let mut out = stdout();
        loop {
            while let Some(done) = self.dispatcher.try_recv() {
                let outcome = self.session.complete(done.token, done.result);
                self.on_completion(&done.word, outcome);
            }
            self.resize()?;
            self.draw(&mut out)?;

            if !event::poll(POLL_INTERVAL)? {
                continue;
            }
            let flow = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key)?,
                Event::Mouse(mouse) => self.on_mouse(mouse)?,
                _ => Flow::Continue,
            };
            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn on_completion(&mut self, word: &str, outcome: Completion) {
        match outcome {
            Completion::Committed { replacement } => {
                self.status = format!("{word} -> {}", replacement.trim_end());
            }
            Completion::FellBack => self.status = format!("backend unavailable, kept {word}"),
            Completion::OverlayShown => {
                self.highlighted = 0;
                self.status = format!("suggestions for {word}");
            }
            Completion::OverlayHidden => self.status = format!("no suggestions for {word}"),
            Completion::Stale => self.status = format!("text changed, dropped result for {word}"),
            Completion::Superseded => {}
        }
    }

    fn submit(&mut self, request: TransliterationRequest) -> akshar::Result<()> {
        self.status = format!("looking up {}", request.word);
        self.dispatcher.submit(request)
    }

    fn resize(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.screen_rows = rows;
        self.measure.origin_x = 0;
        self.measure.origin_y = FIELD_TOP;
        self.measure.width = cols.max(1);
        self.measure.height = rows.saturating_sub(FIELD_TOP + 1).max(1);
        self.measure
            .follow_caret(self.session.buffer(), self.session.cursor());
        Ok(())
    }

    /// Overlay placement, pulled left if it would run off the screen.
    fn overlay_layout(&self) -> Option<OverlayLayout> {
        let mut layout = self.session.overlay_layout(&self.measure, &CELL_STYLE)?;
        let max_x = (self.measure.width as f32 - layout.width).max(0.0);
        layout.x = layout.x.min(max_x);
        Some(layout)
    }

    fn on_key(&mut self, key: KeyEvent) -> akshar::Result<Flow> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            return Ok(Flow::Quit);
        }

        if self.session.overlay().is_visible() {
            let count = self.session.overlay().entries().len();
            match key.code {
                KeyCode::Up => {
                    self.highlighted = self.highlighted.checked_sub(1).unwrap_or(count - 1);
                    return Ok(Flow::Continue);
                }
                KeyCode::Down => {
                    self.highlighted = (self.highlighted + 1) % count;
                    return Ok(Flow::Continue);
                }
                KeyCode::Enter => {
                    self.session.select_suggestion(self.highlighted);
                    return Ok(Flow::Continue);
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Char(' ') => {
                if let DelimiterOutcome::Requested(request) = self.session.commit_on_delimiter(' ')
                {
                    self.submit(request)?;
                }
            }
            KeyCode::Char(c) if !ctrl => self.session.insert_char(c),
            KeyCode::Enter => self.session.insert_char('\n'),
            KeyCode::Backspace => self.session.delete_backward(),
            KeyCode::Left => self
                .session
                .set_cursor(self.session.cursor().saturating_sub(1)),
            KeyCode::Right => self.session.set_cursor(self.session.cursor() + 1),
            KeyCode::Tab => {
                if let Some(request) = self.session.pointer_release(self.session.cursor()) {
                    self.submit(request)?;
                }
            }
            KeyCode::Esc => self.session.dismiss(),
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> akshar::Result<Flow> {
        if mouse.kind != MouseEventKind::Up(MouseButton::Left) {
            return Ok(Flow::Continue);
        }
        let (column, row) = (mouse.column, mouse.row);

        if let Some(layout) = self.overlay_layout() {
            if let Some(index) = layout.row_at(column as f32, row as f32) {
                self.session.select_suggestion(index);
                return Ok(Flow::Continue);
            }
        }

        if self.measure.contains(column, row) {
            let offset = self.measure.offset_at(self.session.buffer(), column, row);
            if let Some(request) = self.session.pointer_release(offset) {
                self.submit(request)?;
            }
        } else {
            self.session.dismiss();
        }
        Ok(Flow::Continue)
    }

    fn draw(&self, out: &mut Stdout) -> io::Result<()> {
        queue!(
            out,
            Hide,
            Clear(ClearType::All),
            MoveTo(0, 0),
            SetAttribute(Attribute::Bold),
            Print("akshar"),
            SetAttribute(Attribute::Reset),
            Print("  space: transliterate  click/tab: suggestions  esc: close  ctrl-q: quit"),
        )?;

        let buffer = self.session.buffer();
        let rows = visual_rows(buffer, self.measure.width as usize);
        for (i, row) in rows
            .iter()
            .skip(self.measure.scroll)
            .take(self.measure.height as usize)
            .enumerate()
        {
            queue!(
                out,
                MoveTo(self.measure.origin_x, self.measure.origin_y + i as u16),
                Print(row)
            )?;
        }

        let status_row = self.screen_rows.saturating_sub(1);
        if let Some(layout) = self.overlay_layout() {
            for (i, entry) in self.session.overlay().entries().iter().enumerate() {
                let rect = layout.row_rect(i);
                let (x, y) = (rect.x.max(0.0) as u16, rect.y.max(0.0) as u16);
                if y >= status_row {
                    break;
                }
                let fill = (layout.width as usize).saturating_sub(entry.text.width() + 1);
                let text = format!(" {}{}", entry.text, " ".repeat(fill));
                if i == self.highlighted {
                    queue!(out, SetAttribute(Attribute::Reverse))?;
                }
                if entry.style == EntryStyle::Original {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                queue!(out, MoveTo(x, y), Print(text), SetAttribute(Attribute::Reset))?;
            }
        }

        queue!(out, MoveTo(0, status_row), Print(&self.status))?;

        let caret = self.measure.caret_cell(buffer, self.session.cursor());
        let caret_row = caret.row.saturating_sub(self.measure.scroll) as u16;
        queue!(
            out,
            MoveTo(
                self.measure.origin_x + caret.col as u16,
                self.measure.origin_y + caret_row
            ),
            Show
        )?;
        out.flush()
    }
}
