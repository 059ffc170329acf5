//! Tools available to every crew member.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A capability a crew member can invoke with a single text argument.
pub trait CrewTool: Send + Sync {
    /// Unique name of the tool (e.g., "knowledge_base_search").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn run(&self, input: &str) -> String;
}

// ---------------------------------------------------------------------------
// Knowledge base
// ---------------------------------------------------------------------------

const KB_FALLBACK: &str =
    "No specific knowledge base entry found. Please escalate to appropriate specialist.";

/// (category, [(key, answer)]) in lookup order.
const KB_ENTRIES: &[(&str, &[(&str, &str)])] = &[
    (
        "billing",
        &[
            ("refund", "Refunds can be processed within 5-7 business days. Customer needs to provide order number and reason for refund."),
            ("payment", "Payment issues can be resolved by updating payment method in account settings or contacting billing support."),
            ("subscription", "Subscription changes take effect immediately. Downgrades are prorated to the next billing cycle."),
        ],
    ),
    (
        "technical",
        &[
            ("login", "Login issues: 1) Clear browser cache 2) Reset password 3) Check account status 4) Contact support if persists"),
            ("performance", "Performance issues: 1) Check internet connection 2) Update browser 3) Disable extensions 4) Try incognito mode"),
            ("integration", "API integration issues: 1) Check API key validity 2) Verify endpoint URLs 3) Review rate limits 4) Check documentation"),
        ],
    ),
    (
        "general",
        &[
            ("hours", "Customer support hours: Monday-Friday 9AM-6PM EST, Saturday 10AM-4PM EST"),
            ("contact", "Contact options: Live chat, email support@company.com, phone 1-800-SUPPORT"),
            ("account", "Account management: Login to dashboard to update profile, billing, and preferences"),
        ],
    ),
];

/// Searches canned answers by key or category name.
#[derive(Debug, Default, Clone)]
pub struct KnowledgeBaseTool;

impl KnowledgeBaseTool {
    /// The matched answer, or `None` when nothing in the query is known.
    pub fn lookup(&self, query: &str) -> Option<&'static str> {
        let query = query.to_lowercase();
        KB_ENTRIES.iter().find_map(|(category, entries)| {
            entries
                .iter()
                .find(|(key, _)| query.contains(key) || query.contains(category))
                .map(|(_, answer)| *answer)
        })
    }
}

impl CrewTool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        "knowledge_base_search"
    }

    fn description(&self) -> &str {
        "Search the knowledge base for solutions to customer problems"
    }

    fn run(&self, input: &str) -> String {
        match self.lookup(input) {
            Some(answer) => format!("Knowledge Base Result: {answer}"),
            None => KB_FALLBACK.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Customer data
// ---------------------------------------------------------------------------

struct CustomerRecord {
    id: &'static str,
    name: &'static str,
    tier: &'static str,
    account_status: &'static str,
    last_interaction: &'static str,
    open_tickets: u32,
    satisfaction_score: f32,
}

const CUSTOMERS: &[CustomerRecord] = &[
    CustomerRecord {
        id: "CUST001",
        name: "John Smith",
        tier: "Premium",
        account_status: "Active",
        last_interaction: "2024-01-15",
        open_tickets: 0,
        satisfaction_score: 4.5,
    },
    CustomerRecord {
        id: "CUST002",
        name: "Sarah Johnson",
        tier: "Standard",
        account_status: "Active",
        last_interaction: "2024-01-10",
        open_tickets: 1,
        satisfaction_score: 3.8,
    },
];

/// Looks up customer profile and interaction history.
#[derive(Debug, Default, Clone)]
pub struct CustomerDataTool;

impl CustomerDataTool {
    /// Customer name for a known id. Ids are matched case-insensitively since
    /// the adapter lowercases ids it extracts from conversation text.
    pub fn customer_name(&self, customer_id: &str) -> Option<&'static str> {
        find_customer(customer_id).map(|c| c.name)
    }
}

fn find_customer(customer_id: &str) -> Option<&'static CustomerRecord> {
    CUSTOMERS
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(customer_id.trim()))
}

impl CrewTool for CustomerDataTool {
    fn name(&self) -> &str {
        "customer_data_lookup"
    }

    fn description(&self) -> &str {
        "Look up customer information and interaction history"
    }

    fn run(&self, input: &str) -> String {
        match find_customer(input) {
            Some(c) => format!(
                "Customer: {}, Tier: {}, Status: {}, Last Contact: {}, Open Tickets: {}, Satisfaction: {}/5",
                c.name, c.tier, c.account_status, c.last_interaction, c.open_tickets, c.satisfaction_score
            ),
            None => format!("Customer {input} not found in database."),
        }
    }
}

// ---------------------------------------------------------------------------
// Ticketing
// ---------------------------------------------------------------------------

/// Opens support tickets for follow-up.
#[derive(Debug, Default, Clone)]
pub struct TicketingTool;

impl TicketingTool {
    /// Deterministic ticket id derived from the ticket text.
    pub fn ticket_id(title: &str, description: &str) -> String {
        let mut h = DefaultHasher::new();
        title.hash(&mut h);
        description.hash(&mut h);
        format!("TKT-{:04}", h.finish() % 10_000)
    }

    pub fn create(&self, title: &str, description: &str, priority: &str) -> String {
        format!(
            "Support ticket {} created successfully. Priority: {priority}. Title: {title}",
            Self::ticket_id(title, description)
        )
    }
}

impl CrewTool for TicketingTool {
    fn name(&self) -> &str {
        "create_ticket"
    }

    fn description(&self) -> &str {
        "Create a support ticket for tracking customer issues"
    }

    /// Single-argument form: the input is both title and description.
    fn run(&self, input: &str) -> String {
        self.create(input, input, "medium")
    }
}
