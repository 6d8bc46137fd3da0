use std::io::{self, BufRead, Write};

/// Supplies the verification code mailed to the user during login.
/// Returning `None` (or an empty string) abandons the attempt.
///
/// Called synchronously from inside the async login. An implementation
/// that blocks (such as [`ConsolePrompt`]) holds up the task polling the
/// login; hosts running it on a shared multi-threaded runtime should drive
/// the login from `tokio::task::spawn_blocking` or collect the code first
/// and pass a [`StaticPrompt`].
pub trait CodeProvider {
    fn verification_code(&self, email: &str) -> Option<String>;
}

/// Supplies the email address for a first-run login
pub trait EmailProvider {
    fn email(&self) -> Option<String>;
}

/// Everything a lazy first-run login needs to ask the user
pub trait Prompt: EmailProvider + CodeProvider {}

impl<T: EmailProvider + CodeProvider + ?Sized> Prompt for T {}

impl<F> CodeProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn verification_code(&self, email: &str) -> Option<String> {
        self(email)
    }
}

/// Blocking prompts on stdin/stdout. Suited to a CLI's main task, not to
/// a worker thread of a shared runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompt;

impl ConsolePrompt {
    fn ask(label: &str) -> Option<String> {
        print!("{}", label);
        io::stdout().flush().ok()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input).ok()?;
        non_empty(&input)
    }
}

impl EmailProvider for ConsolePrompt {
    fn email(&self) -> Option<String> {
        Self::ask("Enter your email address: ")
    }
}

impl CodeProvider for ConsolePrompt {
    fn verification_code(&self, email: &str) -> Option<String> {
        println!("\nPlease check {} for the verification code", email);
        Self::ask("Enter verification code: ")
    }
}

/// Fixed answers, for services and tests that cannot block on a terminal
#[derive(Debug, Clone, Default)]
pub struct StaticPrompt {
    email: Option<String>,
    code: Option<String>,
}

impl StaticPrompt {
    pub fn new(email: Option<String>, code: Option<String>) -> Self {
        Self { email, code }
    }

    pub fn code(code: impl Into<String>) -> Self {
        Self {
            email: None,
            code: Some(code.into()),
        }
    }
}

impl EmailProvider for StaticPrompt {
    fn email(&self) -> Option<String> {
        self.email.as_deref().and_then(non_empty)
    }
}

impl CodeProvider for StaticPrompt {
    fn verification_code(&self, _email: &str) -> Option<String> {
        self.code.as_deref().and_then(non_empty)
    }
}

fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
