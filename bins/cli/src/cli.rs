//! Command-line arguments.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use ledgerwise_core::accounts::RemovalMode;
use ledgerwise_core::attachment::AttachmentType;
use ledgerwise_core::journal::{ActorRole, EntryStatus};
use ledgerwise_shared::types::{
    AccountId, AttachmentId, ClientId, ConsolidationGroupId, DimensionValueId, EntityId,
    JournalEntryId,
};

/// Double-entry bookkeeping for multi-entity clients.
#[derive(Parser, Debug)]
#[command(name = "ledgerwise", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Chart of accounts
    Accounts(AccountsArgs),
    /// Journal entries
    Entries(EntriesArgs),
    /// Financial statements
    Reports(ReportsArgs),
    /// Files attached to journal entries
    Attachments(AttachmentsArgs),
}

#[derive(Args, Debug)]
pub struct ClientArg {
    /// Client the command runs for
    #[arg(long, env = "LEDGERWISE_CLIENT")]
    pub client: ClientId,
}

// ----------------------------------------------------------------------------
// accounts
// ----------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct AccountsArgs {
    #[command(subcommand)]
    pub command: AccountsCommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountsCommand {
    /// List the chart of accounts
    List {
        #[command(flatten)]
        client: ClientArg,
    },
    /// Reconcile an uploaded chart with the stored one
    Import {
        /// CSV, TSV or TXT file
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        client: ClientArg,
        /// What happens to accounts missing from the file
        #[arg(long, value_enum)]
        removal: Option<RemovalArg>,
        /// Report the changes without writing them
        #[arg(long)]
        dry_run: bool,
    },
    /// Lines posted to one account
    Ledger {
        /// Account id
        account: AccountId,
        #[command(flatten)]
        client: ClientArg,
        #[command(flatten)]
        period: PeriodArgs,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RemovalArg {
    /// Mark missing accounts inactive
    Deactivate,
    /// Delete missing accounts without lines or children
    Delete,
}

impl From<RemovalArg> for RemovalMode {
    fn from(arg: RemovalArg) -> Self {
        match arg {
            RemovalArg::Deactivate => Self::Deactivate,
            RemovalArg::Delete => Self::Delete,
        }
    }
}

// ----------------------------------------------------------------------------
// entries
// ----------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct EntriesArgs {
    #[command(subcommand)]
    pub command: EntriesCommand,
}

#[derive(Subcommand, Debug)]
pub enum EntriesCommand {
    /// Review an uploaded batch of journal lines and commit the chosen groups
    Review(ReviewArgs),
    /// List entry headers, newest first
    List {
        #[command(flatten)]
        client: ClientArg,
        /// draft, pending_approval, posted or void
        #[arg(long, value_parser = parse_status)]
        status: Option<EntryStatus>,
    },
    /// Show one entry
    Show {
        /// Entry id
        id: JournalEntryId,
        #[command(flatten)]
        client: ClientArg,
    },
    /// Submit a draft; privileged roles post directly
    Submit {
        /// Entry id
        id: JournalEntryId,
        #[command(flatten)]
        client: ClientArg,
        #[arg(long, value_parser = parse_role, default_value = "staff")]
        role: ActorRole,
    },
    /// Approve a pending entry
    Approve {
        /// Entry id
        id: JournalEntryId,
        #[command(flatten)]
        client: ClientArg,
        #[arg(long, value_parser = parse_role)]
        role: ActorRole,
    },
    /// Send a pending entry back to draft
    Reject {
        /// Entry id
        id: JournalEntryId,
        #[command(flatten)]
        client: ClientArg,
        #[arg(long, value_parser = parse_role)]
        role: ActorRole,
        /// Why the entry was rejected
        #[arg(long)]
        reason: String,
    },
    /// Reverse a posted entry
    Reverse {
        /// Entry id
        id: JournalEntryId,
        #[command(flatten)]
        client: ClientArg,
        /// Date of the reversing entry
        #[arg(long)]
        date: NaiveDate,
    },
    /// Delete a draft
    Delete {
        /// Entry id
        id: JournalEntryId,
        #[command(flatten)]
        client: ClientArg,
    },
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    /// CSV, TSV or TXT file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
    #[command(flatten)]
    pub client: ClientArg,
    /// Entity the entries are booked under
    #[arg(long)]
    pub entity: EntityId,
    /// Select a group by key; repeatable
    #[arg(long = "select", value_name = "KEY")]
    pub select: Vec<String>,
    /// Select every valid group
    #[arg(long)]
    pub select_all: bool,
    /// Create the unknown dimension values the file references
    #[arg(long)]
    pub approve_values: bool,
    /// Store the selected valid groups as drafts
    #[arg(long)]
    pub commit: bool,
    /// Submit committed drafts with this role
    #[arg(long, value_parser = parse_role, requires = "commit")]
    pub submit_as: Option<ActorRole>,
}

fn parse_role(s: &str) -> Result<ActorRole, String> {
    ActorRole::parse(s).ok_or_else(|| format!("unknown role `{s}` (staff, accountant, admin)"))
}

fn parse_status(s: &str) -> Result<EntryStatus, String> {
    EntryStatus::parse(s).ok_or_else(|| format!("unknown status `{s}`"))
}

// ----------------------------------------------------------------------------
// reports
// ----------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct ReportsArgs {
    #[command(subcommand)]
    pub command: ReportsCommand,
}

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// First day included; omit for since inception
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last day included
    #[arg(long)]
    pub to: NaiveDate,
}

#[derive(Args, Debug)]
pub struct ScopeArgs {
    #[command(flatten)]
    pub client: ClientArg,
    /// Restrict to one entity
    #[arg(long)]
    pub entity: Option<EntityId>,
    /// Keep lines tagged with this dimension value; repeatable
    #[arg(long = "dimension-value", value_name = "ID")]
    pub dimension_values: Vec<DimensionValueId>,
    /// With a dimension filter, also keep untagged lines
    #[arg(long)]
    pub include_untagged: bool,
}

#[derive(Subcommand, Debug)]
pub enum ReportsCommand {
    /// Trial balance
    TrialBalance {
        #[command(flatten)]
        scope: ScopeArgs,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Balance sheet as of a date
    BalanceSheet {
        #[command(flatten)]
        client: ClientArg,
        #[arg(long)]
        entity: Option<EntityId>,
        #[arg(long)]
        as_of: NaiveDate,
    },
    /// Income statement for a period
    IncomeStatement {
        #[command(flatten)]
        scope: ScopeArgs,
        #[command(flatten)]
        period: PeriodArgs,
    },
    /// Consolidated trial balance of a group of entities
    Consolidate {
        #[command(flatten)]
        client: ClientArg,
        #[arg(long)]
        group: ConsolidationGroupId,
        #[arg(long)]
        as_of: NaiveDate,
    },
}

// ----------------------------------------------------------------------------
// attachments
// ----------------------------------------------------------------------------

#[derive(Args, Debug)]
pub struct AttachmentsArgs {
    #[command(subcommand)]
    pub command: AttachmentsCommand,
}

#[derive(Subcommand, Debug)]
pub enum AttachmentsCommand {
    /// Attach a file to an entry
    Add {
        /// File to upload
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[command(flatten)]
        client: ClientArg,
        #[arg(long)]
        entity: EntityId,
        #[arg(long)]
        entry: JournalEntryId,
        /// receipt, invoice, contract, supporting_document or other
        #[arg(long = "type", value_parser = parse_attachment_type, default_value = "other")]
        attachment_type: AttachmentType,
        /// Declared MIME type; guessed from the extension when omitted
        #[arg(long)]
        content_type: Option<String>,
    },
    /// List an entry's attachments
    List {
        #[command(flatten)]
        client: ClientArg,
        #[arg(long)]
        entry: JournalEntryId,
    },
    /// Save an attachment's bytes to a file
    Download {
        /// Attachment id
        id: AttachmentId,
        #[command(flatten)]
        client: ClientArg,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Remove an attachment and its stored bytes
    Remove {
        /// Attachment id
        id: AttachmentId,
        #[command(flatten)]
        client: ClientArg,
    },
}

fn parse_attachment_type(s: &str) -> Result<AttachmentType, String> {
    AttachmentType::parse(&s.trim().to_lowercase().replace('-', "_"))
        .ok_or_else(|| format!("unknown attachment type `{s}`"))
}
