pub mod debounce;
pub mod live;
pub mod region;
pub mod selection;

pub use debounce::Debouncer;
pub use live::{
    LiveSearch,
    SearchBackend,
    SearchEvent,
};
pub use region::ResultRegion;
pub use selection::InvoiceSelection;

use crate::api::Endpoint;

pub const INVOICE_CHECKBOX_CLASS: &str = "all_download_checkboxes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchTarget {
    Campaigns,
    Members,
    BillingHistory,
}

impl SearchTarget {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            SearchTarget::Campaigns => Endpoint::CampaignSearch,
            SearchTarget::Members => Endpoint::MemberSearch,
            SearchTarget::BillingHistory => Endpoint::BillingSearch,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchTarget::Campaigns => "campaigns",
            SearchTarget::Members => "members",
            SearchTarget::BillingHistory => "billing_history",
        }
    }

    /// Billing history rows carry invoice checkboxes.
    pub fn has_invoice_selection(&self) -> bool {
        matches!(self, SearchTarget::BillingHistory)
    }
}
