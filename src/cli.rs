use std::path::PathBuf;

use clap::{
    Args,
    Parser,
    Subcommand,
    ValueEnum,
};
use embermail::{
    api::account::MailboxFlow,
    validation::forms,
    FormValidation,
    SearchTarget,
};

#[derive(Parser, Debug)]
#[command(name = "embermail", version, about = "Embermail dashboard client")]
pub struct Cli {
    #[arg(long, global = true, help = "Override the configured server base URL")]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Live search driven by stdin: every line is the new content of the search box.
    Search {
        #[arg(value_enum)]
        target: TargetArg,
        #[arg(long, help = "Debounce delay in milliseconds")]
        delay_ms: Option<u64>,
    },
    /// Run a form's validation gate locally without sending anything.
    Validate {
        #[arg(value_enum)]
        form: FormKind,
        #[arg(help = "field=value pairs; card fields take `ok` or an error text")]
        fields: Vec<String>,
    },
    /// Validate and submit a form.
    Submit {
        #[arg(value_enum)]
        form: FormKind,
        fields: Vec<String>,
        #[arg(long, help = "Encoded token from the password reset link")]
        token: Option<String>,
        #[arg(long, help = "Payment method id returned by the card processor")]
        payment_method: Option<String>,
        #[arg(long, default_value_t = false, help = "Sign up through a team invitation")]
        join_team: bool,
    },
    /// Download invoices from the billing history.
    Invoices {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long = "select", help = "Invoice URL to download; repeatable. Default: all")]
        selected: Vec<String>,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Create, edit and remove the templates of a warmup mailbox.
    Template {
        #[arg(long, help = "Warmup mailbox the templates belong to")]
        mailbox: String,
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Edit the follow-up threads of one template.
    Thread {
        #[arg(long)]
        template_id: String,
        #[command(subcommand)]
        action: ThreadAction,
    },
    /// Connect warmup mailboxes and manage their subscriptions.
    Mailbox {
        #[command(subcommand)]
        action: MailboxAction,
    },
    /// Update the signed-in user's profile.
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Print the effective settings.
    Config {
        #[arg(long, default_value_t = false, help = "Persist the effective settings")]
        save: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateAction {
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        subject: String,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        subject: String,
    },
    /// Switch between active and inactive.
    ToggleStatus {
        #[arg(long)]
        id: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Copy a stock template into the mailbox.
    AddDefault {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ThreadAction {
    Add {
        #[arg(long, default_value = "")]
        body: String,
    },
    Update {
        #[arg(long)]
        id: String,
        #[arg(long, default_value = "")]
        body: String,
    },
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MailboxAction {
    AddEmail {
        #[arg(long, default_value = "")]
        email: String,
        #[command(flatten)]
        flow: FlowArgs,
    },
    AppPassword {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        app_password: String,
        #[command(flatten)]
        flow: FlowArgs,
    },
    /// App password step of the team-joining flow.
    JoinAppPassword {
        #[arg(long, default_value = "")]
        app_password: String,
    },
    CancelSubscription {
        #[arg(long)]
        warmup_email: String,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FlowArgs {
    #[arg(long = "flow")]
    pub selected_flow: Option<String>,
    #[arg(long = "provider")]
    pub email_provider: Option<String>,
}

impl From<FlowArgs> for MailboxFlow {
    fn from(args: FlowArgs) -> Self {
        MailboxFlow { selected_flow: args.selected_flow, email_provider: args.email_provider }
    }
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    Rename {
        #[arg(long, default_value = "")]
        name: String,
    },
    ChangePassword {
        #[arg(long = "current", default_value = "")]
        current_password: String,
        #[arg(long = "new", default_value = "")]
        new_password: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetArg {
    Campaigns,
    Members,
    Billing,
}

impl From<TargetArg> for SearchTarget {
    fn from(arg: TargetArg) -> Self {
        match arg {
            TargetArg::Campaigns => SearchTarget::Campaigns,
            TargetArg::Members => SearchTarget::Members,
            TargetArg::Billing => SearchTarget::BillingHistory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormKind {
    Signup,
    Login,
    PasswordReset,
    PasswordResetConfirm,
    Contact,
    Payment,
}

impl FormKind {
    pub fn build(&self) -> FormValidation {
        match self {
            FormKind::Signup => forms::signup_form(),
            FormKind::Login => forms::login_form(),
            FormKind::PasswordReset => forms::password_reset_form(),
            FormKind::PasswordResetConfirm => forms::password_reset_confirm_form(),
            FormKind::Contact => forms::contact_form(),
            FormKind::Payment => forms::payment_form(),
        }
    }
}

/// Splits `name=value`; a missing `=` means an empty value.
pub fn parse_field(raw: &str) -> (&str, &str) {
    raw.split_once('=').unwrap_or((raw, ""))
}
