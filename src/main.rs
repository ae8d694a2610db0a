use std::fs::File;
use std::io::{self, Stdout};
use std::time::Duration;

use clap::Parser;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use pacman_board::config::{self, Config};
use pacman_board::render::{self, Renderer};
use pacman_board::session::{self, Outcome, Session};

fn main() -> io::Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(Hide)?;

    let result = run(&mut stdout, &config);

    stdout.execute(Show)?;
    stdout.execute(LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn init_logging(config: &Config) -> io::Result<()> {
    // The terminal belongs to the game, so logs only go to a file.
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    env_logger::Builder::new()
        .filter_level(config.verbose.log_level_filter())
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn run(stdout: &mut Stdout, config: &Config) -> io::Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::from_config(config);
    let mut renderer = Renderer::new(session.board().size());
    let frame_time = Duration::from_micros(1_000_000 / config::read_render_fps());
    info!(
        "starting on a {}x{} board, saving to {}",
        session.board().size(),
        session.board().size(),
        session.output().display()
    );

    render::render(stdout, &session, &mut renderer)?;
    loop {
        if !event::poll(frame_time)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let Some(command) = session::command_for_key(key.code) else {
                    continue;
                };
                let outcome = session.apply(command, &mut rng);
                if outcome == Outcome::Quit {
                    return Ok(());
                }
                if outcome.has_update() {
                    render::render(stdout, &session, &mut renderer)?;
                }
            }
            Event::Resize(_, _) => {
                renderer.invalidate();
                render::render(stdout, &session, &mut renderer)?;
            }
            _ => {}
        }
    }
}
