//! Interactive terminal front end. A thin driver: every command maps onto a
//! session or view operation, all failures print a transient notice, and the
//! prompt always comes back.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::documents::DocumentLibrary;
use crate::engine::Engine;
use crate::errors::AppError;
use crate::models::DocType;
use crate::screening::ScreeningView;
use crate::session::chat::ChatSession;
use crate::session::interview::{InterviewPhase, InterviewSession, InterviewStep};
use crate::session::SessionId;

const HELP: &str = "\
Commands:
  /chat                          start a fresh chat session
  /history <session-id>          resume a chat session and load its history
  /interview <name> | <position> start an interview
  /interview-log <session-id>    show a persisted interview record
  /resumes                       show the screening view (catalog + last run)
  /screen <job description>      run a screening against all resumes
  /upload-resume <path>          upload a resume (.pdf / .docx)
  /docs                          list knowledge-base documents
  /upload-doc <path> [type]      upload a document (type: hr|policy|general)
  /help                          show this help
  /quit                          exit
Anything else is sent to the active session.";

enum Mode {
    Chat,
    Interview,
}

pub struct Console<'a> {
    engine: &'a dyn Engine,
    chat: ChatSession,
    interview: InterviewSession,
    screening: ScreeningView,
    documents: DocumentLibrary,
    mode: Mode,
}

impl<'a> Console<'a> {
    pub fn new(engine: &'a dyn Engine) -> Self {
        Console {
            engine,
            chat: ChatSession::new(),
            interview: InterviewSession::new(),
            screening: ScreeningView::new(),
            documents: DocumentLibrary::new(),
            mode: Mode::Chat,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut editor = DefaultEditor::new()?;
        println!("{}", "HR assistant console. /help for commands.".bold());
        println!("chat session: {}", self.chat.id().as_str().dimmed());

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(&line);
                    if line == "/quit" || line == "/exit" {
                        break;
                    }
                    if let Err(e) = self.dispatch(&line).await {
                        self.report(e);
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, line: &str) -> Result<(), AppError> {
        let (command, rest) = match line.split_once(' ') {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        match command {
            "/help" => println!("{HELP}"),
            "/chat" => {
                self.chat = ChatSession::new();
                self.mode = Mode::Chat;
                println!("new chat session: {}", self.chat.id().as_str().dimmed());
            }
            "/history" => self.resume_chat(rest).await?,
            "/interview" => self.start_interview(rest).await?,
            "/interview-log" => self.show_interview_record(rest).await?,
            "/resumes" => self.show_screening_view().await?,
            "/screen" => {
                let count = self.screening.screen(self.engine, rest).await?;
                println!("screened {count} resume(s)");
                self.print_ranking();
            }
            "/upload-resume" => {
                self.screening.upload(self.engine, rest).await?;
                println!("{}", "resume uploaded".green());
            }
            "/docs" => self.show_documents().await?,
            "/upload-doc" => self.upload_document(rest).await?,
            _ if command.starts_with('/') => {
                println!("unknown command {command}; /help for the list");
            }
            _ => self.send_to_active_session(line).await?,
        }
        Ok(())
    }

    async fn send_to_active_session(&mut self, line: &str) -> Result<(), AppError> {
        match self.mode {
            Mode::Chat => {
                let outcome = self.chat.send(self.engine, line).await?;
                println!("{}", outcome.reply.cyan());
                if let Some(confidence) = outcome.confidence {
                    println!("{}", format!("confidence: {confidence:.2}").dimmed());
                }
                if outcome.escalated {
                    // Distinct, non-blocking notice; the transcript is untouched.
                    println!("{}", "⚠ this query was escalated to a human handler".yellow().bold());
                }
            }
            Mode::Interview => match self.interview.answer(self.engine, line).await? {
                InterviewStep::Question { text, number } => {
                    if let Some(number) = number {
                        println!("{}", format!("question {number}").dimmed());
                    }
                    println!("{}", text.cyan());
                }
                InterviewStep::Evaluation { text, final_score } => {
                    println!("{}", text.cyan());
                    println!(
                        "{}",
                        format!("interview completed — final score {final_score:.0}").green().bold()
                    );
                    // Input surface for answers is withdrawn.
                    self.mode = Mode::Chat;
                }
            },
        }
        Ok(())
    }

    async fn resume_chat(&mut self, session_id: &str) -> Result<(), AppError> {
        if session_id.is_empty() {
            return Err(AppError::Validation("Usage: /history <session-id>".to_string()));
        }
        let mut session = ChatSession::with_id(SessionId::from(session_id));
        let loaded = session.hydrate(self.engine).await?;
        println!("loaded {loaded} turn(s) for {session_id}");
        for turn in session.transcript().turns() {
            let speaker = match turn.role {
                crate::session::Role::User => "you".bold(),
                crate::session::Role::Assistant => "assistant".bold().cyan(),
            };
            println!(
                "{} {speaker}: {}",
                turn.timestamp.format("[%H:%M]").to_string().dimmed(),
                turn.content
            );
        }
        self.chat = session;
        self.mode = Mode::Chat;
        Ok(())
    }

    async fn start_interview(&mut self, rest: &str) -> Result<(), AppError> {
        let (name, position) = rest.split_once('|').ok_or_else(|| {
            AppError::Validation("Usage: /interview <candidate name> | <position>".to_string())
        })?;

        // A finished interview stays readable via /interview-log; starting a
        // new one gets a fresh session. An in-progress one is rejected by
        // `start` itself.
        if matches!(self.interview.phase(), InterviewPhase::Completed { .. }) {
            self.interview = InterviewSession::new();
        }

        if let InterviewStep::Question { text, .. } =
            self.interview.start(self.engine, name, position).await?
        {
            println!(
                "interviewing {} for {} ({})",
                self.interview.candidate_name().unwrap_or_default().bold(),
                self.interview.position().unwrap_or_default(),
                self.interview.id().as_str().dimmed()
            );
            println!("{}", text.cyan());
        }
        self.mode = Mode::Interview;
        Ok(())
    }

    async fn show_interview_record(&mut self, session_id: &str) -> Result<(), AppError> {
        if session_id.is_empty() {
            return Err(AppError::Validation("Usage: /interview-log <session-id>".to_string()));
        }
        let record = self
            .engine
            .interview_record(&SessionId::from(session_id))
            .await?;
        println!(
            "{} — {} ({}, {} message(s))",
            record.candidate_name.bold(),
            record.position,
            record.id.dimmed(),
            record.messages.len()
        );
        for message in &record.messages {
            println!(
                "{} {}: {}",
                message.timestamp.format("[%H:%M]").to_string().dimmed(),
                message.role.bold(),
                message.content
            );
        }
        if let Some(score) = record.score {
            println!("{}", format!("final score: {score:.0}").green());
        }
        Ok(())
    }

    async fn show_screening_view(&mut self) -> Result<(), AppError> {
        let count = self.screening.refresh_catalog(self.engine).await?;
        println!("{count} resume(s) in catalog");
        for item in self.screening.catalog() {
            let candidate = item.candidate_name.as_deref().unwrap_or("unknown candidate");
            println!(
                "  {} — {} (uploaded {})",
                item.filename,
                candidate,
                item.uploaded_at.format("%Y-%m-%d")
            );
        }
        self.print_ranking();
        Ok(())
    }

    fn print_ranking(&self) {
        let display = self.screening.display_list();
        if display.is_empty() {
            println!("{}", "no screened resumes to show".dimmed());
            return;
        }
        for row in &display {
            println!(
                "{} {} ({:.0})",
                format!("#{}", row.rank).bold(),
                row.filename,
                row.score
            );
            if let Some(analysis) = &row.analysis {
                println!("   {}", analysis.dimmed());
            }
        }
    }

    async fn show_documents(&mut self) -> Result<(), AppError> {
        let count = self.documents.refresh(self.engine).await?;
        println!("{count} document(s)");
        for doc in self.documents.documents() {
            println!(
                "{} [{}] {} {}",
                doc.filename.bold(),
                doc.doc_type.as_str(),
                doc.id.dimmed(),
                doc.content.dimmed()
            );
        }
        Ok(())
    }

    async fn upload_document(&mut self, rest: &str) -> Result<(), AppError> {
        let (path, doc_type) = match rest.split_once(' ') {
            Some((p, t)) => (p, DocType::parse(t)?),
            None => (rest, DocType::Hr),
        };
        self.documents.upload(self.engine, path, doc_type).await?;
        println!("{}", "document uploaded".green());
        Ok(())
    }

    /// Transient-notification path: every failure is printed and the prompt
    /// returns; nothing terminates the session.
    fn report(&self, error: AppError) {
        if error.is_transient() {
            println!("{}", format!("⚠ {error} — please retry").yellow());
        } else {
            println!("{}", error.to_string().red());
        }
    }
}
