use nu_ansi_term::{Color, Style};
use reedline::{
    default_emacs_keybindings, default_vi_insert_keybindings, default_vi_normal_keybindings,
    DefaultHinter, EditMode, Emacs, FileBackedHistory, Prompt, PromptEditMode,
    PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal, Vi,
};

use crate::highlighter::CrobotsHighlighter;
use crate::session::Session;
use crate::validator::CrobotsValidator;

/// Custom prompt for the robot REPL.
struct CrobotsPrompt;

impl Prompt for CrobotsPrompt {
    fn render_prompt_left(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Owned(Color::Green.bold().paint("crobots").to_string())
    }

    fn render_prompt_right(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, edit_mode: PromptEditMode) -> std::borrow::Cow<'_, str> {
        match edit_mode {
            PromptEditMode::Default | PromptEditMode::Emacs => std::borrow::Cow::Borrowed("> "),
            PromptEditMode::Vi(vi_mode) => match vi_mode {
                reedline::PromptViMode::Normal => std::borrow::Cow::Borrowed(": "),
                reedline::PromptViMode::Insert => std::borrow::Cow::Borrowed("> "),
            },
            PromptEditMode::Custom(_) => std::borrow::Cow::Borrowed("> "),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> std::borrow::Cow<'_, str> {
        std::borrow::Cow::Borrowed("... > ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> std::borrow::Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        std::borrow::Cow::Owned(format!("{}search: ", prefix))
    }
}

/// Build the history file path, creating parent directories if needed.
fn history_path() -> Option<std::path::PathBuf> {
    let data_dir = data_dir()?.join("crobots");
    std::fs::create_dir_all(&data_dir).ok()?;
    Some(data_dir.join("history.txt"))
}

/// Get the XDG data directory or fall back to ~/.local/share.
fn data_dir() -> Option<std::path::PathBuf> {
    std::env::var_os("XDG_DATA_HOME")
        .map(std::path::PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME").map(|h| std::path::PathBuf::from(h).join(".local/share"))
        })
}

/// Run the interactive REPL with reedline.
pub fn run_repl(vi_mode: bool) {
    let mut session = Session::new();

    let hinter = DefaultHinter::default().with_style(Style::new().fg(Color::DarkGray));

    let edit_mode: Box<dyn EditMode> = if vi_mode {
        Box::new(Vi::new(
            default_vi_insert_keybindings(),
            default_vi_normal_keybindings(),
        ))
    } else {
        Box::new(Emacs::new(default_emacs_keybindings()))
    };

    let mut editor = Reedline::create()
        .with_highlighter(Box::new(CrobotsHighlighter))
        .with_validator(Box::new(CrobotsValidator))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(edit_mode);

    if let Some(path) = history_path() {
        if let Ok(history) = FileBackedHistory::with_file(1000, path) {
            editor = editor.with_history(Box::new(history));
        }
    }

    let prompt = CrobotsPrompt;

    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(buffer)) => {
                let result = session.exec(&buffer);

                for out in session.take_output() {
                    println!("{}", out);
                }

                if let Err(e) = result {
                    eprintln!("{}", e);
                }
            }
            Ok(Signal::CtrlC) => {
                // Clear current line, continue
            }
            Ok(Signal::CtrlD) => {
                break;
            }
            Err(err) => {
                eprintln!("I/O error: {}", err);
                break;
            }
        }
    }
}
