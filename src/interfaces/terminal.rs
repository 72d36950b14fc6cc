//! Interactive terminal front-end.
//!
//! A thin adapter: every command maps onto one [`EquipmentService`] call,
//! submitted through the [`BackgroundExecutor`], and its result is rendered
//! as text. Workflow messages reach the user through the activity log.

use crate::application::dispatch::BackgroundExecutor;
use crate::application::orchestrator::{CheckoutRequest, ReturnRequest};
use crate::application::service::EquipmentService;
use crate::domain::booking::Booking;
use crate::domain::inventory::InventoryItem;
use crate::error::{EquipError, Result};
use crate::infrastructure::activity::MemoryActivityLog;
use crate::infrastructure::scanner::SharedInput;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  login                                   scan your badge to log in
  logout                                  end the session
  whoami                                  show the logged-in employee
  inventory                               list equipment available for checkout
  history                                 show your booking history
  open                                    list your current checkouts
  checkout <item-id> [damaged] [notes]    borrow an item (asks for your badge)
  return <booking-id> [damaged] [notes]   return an item (asks for your badge)
  log                                     show recent activity
  clear                                   clear the activity log
  help                                    show this help
  exit                                    log out and quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Logout,
    WhoAmI,
    Inventory,
    History,
    Open,
    Checkout {
        item_id: String,
        is_damaged: bool,
        notes: String,
    },
    Return {
        booking_id: String,
        is_damaged: bool,
        notes: String,
    },
    Log,
    Clear,
    Help,
    Exit,
}

impl Command {
    pub fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(String::new());
        };
        let rest: Vec<&str> = words.collect();

        match verb.to_ascii_lowercase().as_str() {
            "login" => Ok(Self::Login),
            "logout" => Ok(Self::Logout),
            "whoami" => Ok(Self::WhoAmI),
            "inventory" => Ok(Self::Inventory),
            "history" => Ok(Self::History),
            "open" => Ok(Self::Open),
            "checkout" => {
                let (item_id, is_damaged, notes) = selection(&rest, "checkout <item-id>")?;
                Ok(Self::Checkout {
                    item_id,
                    is_damaged,
                    notes,
                })
            }
            "return" => {
                let (booking_id, is_damaged, notes) = selection(&rest, "return <booking-id>")?;
                Ok(Self::Return {
                    booking_id,
                    is_damaged,
                    notes,
                })
            }
            "log" => Ok(Self::Log),
            "clear" => Ok(Self::Clear),
            "help" | "?" => Ok(Self::Help),
            "exit" | "quit" => Ok(Self::Exit),
            other => Err(format!("unknown command '{}', type 'help'", other)),
        }
    }
}

/// `<id> [damaged|good] [notes...]`
fn selection(args: &[&str], usage: &str) -> std::result::Result<(String, bool, String), String> {
    let Some((id, rest)) = args.split_first() else {
        return Err(format!("usage: {} [damaged] [notes]", usage));
    };
    let (is_damaged, notes) = match rest.split_first() {
        Some((flag, notes)) if flag.eq_ignore_ascii_case("damaged") => (true, notes),
        Some((flag, notes)) if flag.eq_ignore_ascii_case("good") => (false, notes),
        _ => (false, rest),
    };
    Ok((id.to_string(), is_damaged, notes.join(" ")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Renders a booking history the way the terminal shows it.
pub fn render_history(history: &[Booking]) -> Vec<String> {
    if history.is_empty() {
        return vec![
            "📋 No equipment history found.".to_string(),
            "   This employee has not checked out any equipment yet.".to_string(),
        ];
    }

    let mut lines = vec!["📋 Your Equipment History:".to_string(), "=".repeat(80)];
    for booking in history {
        let state = match booking.date_returned {
            Some(_) => "✅ Returned",
            None => "🔄 Checked Out",
        };
        lines.push(format!("{} | Booking ID: {}", state, booking.booking_id));
        lines.push(format!("Item: {} ({})", booking.item_name, booking.category));
        lines.push(format!("Booked: {}", booking.date_booked));
        if let Some(returned) = &booking.date_returned {
            lines.push(format!("Returned: {}", returned));
        }
        if let Some(notes) = &booking.return_notes {
            lines.push(format!("Notes: {}", notes));
        }
        lines.push("-".repeat(40));
    }
    lines
}

pub struct Terminal<R, W> {
    service: Arc<EquipmentService>,
    executor: BackgroundExecutor,
    activity: Arc<MemoryActivityLog>,
    input: SharedInput<R>,
    out: W,
    available: Option<Vec<InventoryItem>>,
    open: Option<Vec<Booking>>,
}

impl<R, W> Terminal<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write,
{
    pub fn new(
        service: Arc<EquipmentService>,
        executor: BackgroundExecutor,
        activity: Arc<MemoryActivityLog>,
        input: SharedInput<R>,
        out: W,
    ) -> Self {
        Self {
            service,
            executor,
            activity,
            input,
            out,
            available: None,
            open: None,
        }
    }

    /// Runs the command loop until `exit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        writeln!(self.out, "🚀 Starting Nexora Equipment Management System...")?;
        let service = self.service.clone();
        self.executor
            .submit(async move { service.probe().await })
            .wait()
            .await?;
        writeln!(self.out, "Type 'help' for a list of commands.")?;

        loop {
            write!(self.out, "> ")?;
            self.out.flush()?;

            let mut line = String::new();
            if self.input.lock().await.read_line(&mut line).await? == 0 {
                self.service.logout().await;
                return Ok(());
            }
            if self.handle(&line).await? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Executes one command line.
    pub async fn handle(&mut self, line: &str) -> Result<Flow> {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(message) => {
                if !message.is_empty() {
                    writeln!(self.out, "{}", message)?;
                }
                return Ok(Flow::Continue);
            }
        };

        match self.dispatch(command).await {
            Ok(flow) => Ok(flow),
            Err(EquipError::Io(err)) => Err(EquipError::Io(err)),
            // Identity rejections were already reported through the activity log.
            Err(EquipError::IdentityRejected(_)) => Ok(Flow::Continue),
            Err(err) => {
                writeln!(self.out, "❌ {}", err)?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Login => {
                let service = self.service.clone();
                self.executor
                    .submit(async move { service.login().await })
                    .wait()
                    .await??;
                self.forget_listings();
            }
            Command::Logout => {
                self.service.logout().await;
                self.forget_listings();
            }
            Command::WhoAmI => {
                let session = self.service.session().await;
                match (session.employee_id(), session.profile()) {
                    (Some(id), Some(profile)) => writeln!(
                        self.out,
                        "Employee {} - {} ({})",
                        id,
                        profile.display_name(),
                        profile.department
                    )?,
                    (Some(id), None) => writeln!(self.out, "Employee {}", id)?,
                    (None, _) => writeln!(self.out, "Not logged in")?,
                }
            }
            Command::Inventory => {
                let items = self.refresh_available().await?;
                if items.is_empty() {
                    writeln!(self.out, "No equipment available for checkout")?;
                }
                for item in &items {
                    writeln!(self.out, "{}", item.label())?;
                }
            }
            Command::History => {
                let service = self.service.clone();
                let history = self
                    .executor
                    .submit(async move { service.list_history().await })
                    .wait()
                    .await??;
                for line in render_history(&history) {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Command::Open => {
                let open = self.refresh_open().await?;
                if open.is_empty() {
                    writeln!(self.out, "No equipment currently checked out")?;
                }
                for booking in &open {
                    writeln!(self.out, "{}", booking.label())?;
                }
            }
            Command::Checkout {
                item_id,
                is_damaged,
                notes,
            } => {
                self.require_login().await?;
                let listed = match &self.available {
                    Some(items) => items.clone(),
                    None => self.refresh_available().await?,
                };
                if !listed.iter().any(|item| item.item_id == item_id) {
                    writeln!(
                        self.out,
                        "Item {} is not in the available list; run 'inventory' to refresh it",
                        item_id
                    )?;
                    return Ok(Flow::Continue);
                }

                let service = self.service.clone();
                let request = CheckoutRequest {
                    item_id,
                    notes,
                    is_damaged,
                };
                let outcome = self
                    .executor
                    .submit(async move { service.checkout(request).await })
                    .wait()
                    .await??;
                if outcome.is_success() {
                    self.forget_listings();
                }
            }
            Command::Return {
                booking_id,
                is_damaged,
                notes,
            } => {
                self.require_login().await?;
                if booking_id == "N/A" {
                    writeln!(self.out, "Please select a booking ID")?;
                    return Ok(Flow::Continue);
                }
                let listed = match &self.open {
                    Some(open) => open.clone(),
                    None => self.refresh_open().await?,
                };
                if !listed.iter().any(|b| b.booking_id == booking_id) {
                    writeln!(
                        self.out,
                        "Booking {} is not one of your open checkouts; run 'open' to refresh them",
                        booking_id
                    )?;
                    return Ok(Flow::Continue);
                }

                let service = self.service.clone();
                let request = ReturnRequest {
                    booking_id,
                    notes,
                    is_damaged,
                };
                let outcome = self
                    .executor
                    .submit(async move { service.return_item(request).await })
                    .wait()
                    .await??;
                if outcome.is_success() {
                    self.forget_listings();
                }
            }
            Command::Log => {
                for line in self.activity.lines() {
                    writeln!(self.out, "{}", line)?;
                }
            }
            Command::Clear => self.activity.clear(),
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Exit => {
                self.service.logout().await;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    async fn require_login(&self) -> Result<()> {
        if self.service.session().await.is_authenticated() {
            Ok(())
        } else {
            Err(EquipError::NotAuthenticated)
        }
    }

    async fn refresh_available(&mut self) -> Result<Vec<InventoryItem>> {
        let service = self.service.clone();
        let items = self
            .executor
            .submit(async move { service.list_available().await })
            .wait()
            .await?;
        self.available = Some(items.clone());
        Ok(items)
    }

    async fn refresh_open(&mut self) -> Result<Vec<Booking>> {
        let service = self.service.clone();
        let open = self
            .executor
            .submit(async move { service.list_open_checkouts().await })
            .wait()
            .await??;
        self.open = Some(open.clone());
        Ok(open)
    }

    fn forget_listings(&mut self) {
        self.available = None;
        self.open = None;
    }

    pub fn into_output(self) -> W {
        self.out
    }
}
