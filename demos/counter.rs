//! Counter Example - State, subcomponents, messages and a background task
//!
//! - Enter increments the counter, Backspace decrements it
//! - `m` posts a message above the UI
//! - A background task updates the elapsed seconds
//! - Escape quits, Ctrl-D quits reporting end of input
//!
//! Run with: cargo run --example counter
//! Set IMTUI_LOG=path/to/file to write logs there (RUST_LOG filters them).

use std::fs::File;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use imtui::view::{text, AnyView, BoxView, ScrollBarView};
use imtui::{
    comp, run, Attr, Comp, Context, CrosstermTerminal, Event, Finished, Justify, Key, React,
    Reaction, Rgba, RunConfig, Text,
};

const MAX: i64 = 20;

fn init_logging() {
    let Ok(path) = std::env::var("IMTUI_LOG") else {
        return;
    };
    let file = match File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("cannot open log file {path}: {err}");
            return;
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

/// A one-line label showing `label` next to the `value` of its parent.
fn label() -> Comp {
    comp(|c| {
        let name = c.state("name", String::from("?"));
        let view: AnyView = Box::new(text(vec![Text::with_attrs(name.get(), Attr::BOLD)]));
        (view, c.binding_nop_default())
    })
}

fn counter() -> Comp {
    comp(|c: Context| {
        let value = c.state("value", 0i64);
        let elapsed = c.state("elapsed", 0i64);
        let n = value.get();

        let (label_view, _) = c.subcomp("label", label());
        let number: AnyView = Box::new(text(vec![
            Text::colored(format!(" {n}"), Rgba::GREEN),
            Text::plain(format!("  ({}s)", elapsed.get())),
        ]));
        let bar: AnyView = Box::new(ScrollBarView::horizontal(MAX as usize + 1, n as usize, n as usize + 1));
        let help: AnyView = Box::new(text(vec![Text::colored(
            "Enter +1  Backspace -1  m message  Esc quit",
            Rgba::CYAN,
        )]));
        let top: AnyView = Box::new(BoxView::new("[l=] n*", vec![label_view, number]));
        let view: AnyView = Box::new(BoxView::new(
            "t=
             b=
             h=",
            vec![top, bar, help],
        ));

        let ctx = c.clone();
        let react: React = Box::new(move |event| match event {
            Event::Key(key) if key == Key::ENTER => {
                let _ = value.swap(|n| (n + 1).min(MAX));
                Reaction::Consumed
            }
            Event::Key(key) if key == Key::BACKSPACE => {
                let _ = value.swap(|n| (n - 1).max(0));
                Reaction::Consumed
            }
            Event::Key(key) if key == Key::char('m') => {
                ctx.add_msg(Text::plain(format!("counter is at {}", value.get())));
                Reaction::Consumed
            }
            Event::Key(key) if key == Key::ESCAPE => Reaction::Finish,
            Event::Key(key) if key.to_string() == "Ctrl-D" => Reaction::FinishEOF,
            _ => Reaction::Unused,
        });
        (view, c.binding(react))
    })
}

/// Bump `elapsed` once a second until the event loop finishes.
fn start_clock(ctx: Context) {
    thread::spawn(move || {
        let done = ctx.finish_chan();
        let elapsed = ctx.state("elapsed", 0i64);
        while let Err(flume::RecvTimeoutError::Timeout) = done.recv_timeout(Duration::from_secs(1)) {
            ctx.update_async(|| {
                let _ = elapsed.swap(|s| s + 1);
            });
        }
        tracing::debug!("clock stopped");
    });
}

fn main() -> imtui::Result<()> {
    init_logging();

    let f = imtui::with_init(counter(), [("label", imtui::Value::Map(
        [("name", imtui::Value::from("count"))].into_iter().collect(),
    ))]);
    let config = RunConfig::default()
        .max_height(5)
        .justify(Justify::Top)
        .on_context_ready(start_clock);

    match run(f, Arc::new(CrosstermTerminal::new()), config)? {
        Finished::Normal(state) => println!("final value: {:?}", state.get("value")),
        Finished::Eof(_) => println!("end of input"),
    }
    Ok(())
}
