use anyhow::Result;
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

const SPINNER_TICKS_BRAILLE_COLORED: [&str; 8] = [
    "\x1b[1;96m⠁\x1b[0m",
    "\x1b[1;96m⠂\x1b[0m",
    "\x1b[1;96m⠄\x1b[0m",
    "\x1b[1;96m⡀\x1b[0m",
    "\x1b[1;96m⢀\x1b[0m",
    "\x1b[1;96m⠠\x1b[0m",
    "\x1b[1;96m⠐\x1b[0m",
    "\x1b[1;96m⠈\x1b[0m",
];

const SPINNER_TICKS_BRAILLE_PLAIN: [&str; 8] = ["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈"];
const SPINNER_TICKS_ASCII: &str = "|/-\\";
const BAR_CHARS_ASCII: &str = "#>-";
const BAR_CHARS_UNICODE: &str = "█▉░";

const STAGE_TOTAL: u8 = 3;

#[derive(Clone, Copy)]
pub enum Stage {
    Read,
    Convert,
    Write,
}

impl Stage {
    const fn index(self) -> u8 {
        match self {
            Self::Read => 1,
            Self::Convert => 2,
            Self::Write => 3,
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Read => "Reading",
            Self::Convert => "Converting",
            Self::Write => "Writing",
        }
    }
}

pub struct ProgressState {
    multi: MultiProgress,
    spinner_style: ProgressStyle,
    bar_style: ProgressStyle,
}

impl ProgressState {
    pub(crate) fn new(enabled: bool, use_color: bool) -> Self {
        let use_ascii = is_dumb_term();
        let multi = MultiProgress::new();
        multi.set_draw_target(if enabled {
            ProgressDrawTarget::stderr_with_hz(15)
        } else {
            ProgressDrawTarget::hidden()
        });

        let spinner_style = ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        let spinner_style = if use_ascii {
            spinner_style.tick_chars(SPINNER_TICKS_ASCII)
        } else if use_color {
            spinner_style.tick_strings(&SPINNER_TICKS_BRAILLE_COLORED)
        } else {
            spinner_style.tick_strings(&SPINNER_TICKS_BRAILLE_PLAIN)
        };

        let bar_style = ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars(if use_ascii {
                BAR_CHARS_ASCII
            } else {
                BAR_CHARS_UNICODE
            });

        Self {
            multi,
            spinner_style,
            bar_style,
        }
    }

    fn spinner(&self, message: String) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new_spinner());
        bar.set_style(self.spinner_style.clone());
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    }

    pub(crate) fn bar(&self, stage: Stage, label: &str, len: u64) -> ProgressBar {
        let bar = self.multi.add(ProgressBar::new(len));
        bar.set_style(self.bar_style.clone());
        bar.set_message(format_stage_message(stage, label));
        bar
    }

    pub(crate) fn clear(&self) {
        let _ = self.multi.clear();
    }
}

fn is_dumb_term() -> bool {
    std::env::var("TERM").is_ok_and(|term| term.eq_ignore_ascii_case("dumb"))
}

fn format_stage_message(stage: Stage, label: &str) -> String {
    let prefix = format!("[{}/{}]", stage.index(), STAGE_TOTAL);
    format!(
        "{} {}: {}",
        prefix.bright_yellow().bold(),
        stage.label().bright_cyan().bold(),
        label.bright_white().bold()
    )
}

pub fn run_with_spinner<T>(
    progress: &ProgressState,
    stage: Stage,
    label: &str,
    work: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let bar = progress.spinner(format_stage_message(stage, label));
    let result = work();
    let status = if result.is_ok() {
        "done".bright_green().bold()
    } else {
        "failed".bright_red().bold()
    };
    bar.finish_with_message(format!("{} {status}", format_stage_message(stage, label)));
    result
}
