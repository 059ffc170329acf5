//! CLI Demo Command
//!
//! Sends the canned inquiries through the crew and prints each reply.

use anyhow::Result;

use crewcheck_runner::{run_basic_demo, DemoRecord, DEMO_INQUIRIES};

use crate::terminal_output::{note_info, note_success, print_panel, BLUE, BOLD, RED};
use crate::Runtime;

pub async fn run(runtime: &Runtime) -> Result<()> {
    note_info(&format!(
        "Running basic demo with {} customer inquiries",
        DEMO_INQUIRIES.len()
    ));

    let (_, path) = run_basic_demo(
        &runtime.adapter,
        &runtime.store,
        runtime.config.turn_timeout(),
        print_record,
    )
    .await?;

    note_success(&format!("Demo results saved to {}", path.display()));
    Ok(())
}

fn print_record(n: usize, record: &DemoRecord) {
    print_panel(&format!("Customer Inquiry {n}"), &record.inquiry, BLUE);
    match (&record.response, &record.error) {
        (Some(response), _) => print_panel("Crew Response", response, BOLD),
        (None, Some(error)) => print_panel("Error", error, RED),
        (None, None) => {}
    }
}
