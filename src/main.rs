mod cli;
mod dates;
mod engine;
mod fuzzy;
mod model;
mod ops;
mod output;
mod remote;
mod render;
mod storage;

use anyhow::Result;
use clap::Parser;
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use engine::{Engine, Flow};
use output::OutputLog;
use std::io::{self, BufRead, Write};

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let name = match args.board {
        Some(name) => name,
        None => prompt_board_name()?,
    };
    let path = storage::normalize_path(&name);

    let mut log = OutputLog::default();
    let board = storage::load(&path, &mut log)?;
    let remote = args.remote_url.map(|endpoint| remote::RemoteConfig {
        endpoint,
        password: args.remote_password.unwrap_or_default(),
    });

    let mut engine = Engine::new(board, log, path, remote);
    let stdin = io::stdin();
    loop {
        engine.drain_uploads();
        redraw(&engine)?;
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if engine.execute(&line) == Flow::Exit {
            break;
        }
    }
    Ok(())
}

fn prompt_board_name() -> Result<String> {
    print!("Enter a name for your board [kanban]: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    let trimmed = input.trim();
    Ok(if trimmed.is_empty() {
        "kanban".to_string()
    } else {
        trimmed.to_string()
    })
}

fn redraw(engine: &Engine) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    println!("{}", render::text_table(&engine.board));
    if !engine.log.is_empty() {
        println!("History");
        println!("=======");
        for entry in engine.log.tail(OutputLog::DISPLAY_LIMIT) {
            if entry.bold {
                println!("{}", entry.text.as_str().bold());
            } else {
                println!("-- {}", entry.text);
            }
        }
        println!();
    }
    Ok(())
}
