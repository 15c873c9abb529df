use crate::core::session::SessionController;
use crate::core::{ModelLoader, Outcome, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;
use std::io::{BufRead, Write};

const BANNER: &str = "🧠 AI Requirement-to-Test Case Generator";

const INTRO: &str = "Paste a user story or requirement, and this AI will generate structured test scenarios and test cases for you.";

const PROMPT_TIP: &str = "Prompt Tip: Enter a clear user story.\n\
Example: As a user, I want to reset my password via email so that I can recover my account if I forget my password.";

const INPUT_HINT: &str = "📜 Enter User Story / Requirement (finish with an empty line; :download to export, :help, :quit)";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Download,
    Help,
    Quit,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Entry {
    Requirement(String),
    Command(Command),
}

fn parse_command(line: &str) -> Command {
    match line.trim() {
        ":download" | ":d" | ":save" => Command::Download,
        ":help" | ":h" | ":?" => Command::Help,
        ":quit" | ":q" | ":exit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

/// 讀到空行或 EOF 為止；EOF 且沒有任何內容時回傳 None
fn read_entry<R: BufRead>(input: &mut R) -> Result<Option<Entry>> {
    let mut lines: Vec<String> = Vec::new();

    loop {
        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        if read == 0 {
            break;
        }

        let line = line.trim_end_matches(['\n', '\r']).to_string();

        if lines.is_empty() && line.trim_start().starts_with(':') {
            return Ok(Some(Entry::Command(parse_command(&line))));
        }
        if line.trim().is_empty() {
            return Ok(Some(Entry::Requirement(lines.join("\n"))));
        }
        lines.push(line);
    }

    if lines.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Entry::Requirement(lines.join("\n"))))
    }
}

pub fn render_outcome<W: Write>(out: &mut W, outcome: &Outcome) -> Result<()> {
    match outcome {
        Outcome::Success(text) => {
            writeln!(out, "✅ Generated Test Cases:")?;
            writeln!(out, "{}", text)?;
        }
        Outcome::ValidationWarning(message) => writeln!(out, "⚠️ {}", message)?,
        Outcome::Failure(message) => writeln!(out, "❌ {}", message)?,
    }
    out.flush()?;
    Ok(())
}

/// 終端機版的呈現層：輸入、結果、匯出
pub struct TerminalSession<L: ModelLoader, S: Storage> {
    controller: SessionController<L>,
    storage: S,
    monitor: SystemMonitor,
}

impl<L: ModelLoader, S: Storage> TerminalSession<L, S> {
    pub fn new(controller: SessionController<L>, storage: S) -> Self {
        Self {
            controller,
            storage,
            monitor: SystemMonitor::default(),
        }
    }

    pub fn with_monitor(mut self, monitor: SystemMonitor) -> Self {
        self.monitor = monitor;
        self
    }

    pub fn controller(&self) -> &SessionController<L> {
        &self.controller
    }

    pub fn print_banner<W: Write>(out: &mut W) -> Result<()> {
        writeln!(out, "{}", BANNER)?;
        writeln!(out, "{}", INTRO)?;
        writeln!(out)?;
        writeln!(out, "{}", PROMPT_TIP)?;
        Ok(())
    }

    async fn generate<W: Write>(&mut self, requirement: &str, out: &mut W) -> Result<Outcome> {
        let outcome = self.controller.handle_request(requirement).await;
        self.monitor.log_stats("Generation");
        render_outcome(out, &outcome)?;
        Ok(outcome)
    }

    async fn download<W: Write>(&self, out: &mut W) -> Result<()> {
        match self.controller.export_to(&self.storage).await? {
            Some(location) => writeln!(out, "⬇️ Test cases saved to {}", location)?,
            None => writeln!(
                out,
                "⚠️ Nothing to download yet. Generate test cases first."
            )?,
        }
        Ok(())
    }

    /// 單次模式：一個需求、一次生成，成功且要求時匯出
    pub async fn run_once<W: Write>(
        &mut self,
        requirement: &str,
        download: bool,
        out: &mut W,
    ) -> Result<Outcome> {
        let outcome = self.generate(requirement, out).await?;
        if download && outcome.is_success() {
            self.download(out).await?;
        }
        self.monitor.log_final_stats();
        Ok(outcome)
    }

    pub async fn run_interactive<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        out: &mut W,
    ) -> Result<()> {
        Self::print_banner(out)?;

        loop {
            writeln!(out)?;
            writeln!(out, "{}", INPUT_HINT)?;
            write!(out, "> ")?;
            out.flush()?;

            let Some(entry) = read_entry(&mut input)? else {
                break;
            };

            match entry {
                Entry::Command(Command::Quit) => break,
                Entry::Command(Command::Download) => self.download(out).await?,
                Entry::Command(Command::Help) => {
                    writeln!(out, "{}", PROMPT_TIP)?;
                    writeln!(out, "Commands: :download  :help  :quit")?;
                }
                Entry::Command(Command::Unknown(command)) => {
                    writeln!(out, "⚠️ Unknown command: {} (try :help)", command)?
                }
                Entry::Requirement(requirement) => {
                    let outcome = self.generate(&requirement, out).await?;
                    if outcome.is_success() {
                        writeln!(out, "💾 Type :download to save test_cases.txt")?;
                    }
                }
            }
        }

        self.monitor.log_final_stats();
        Ok(())
    }
}
