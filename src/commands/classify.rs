// ABOUTME: Classify command implementation.
// ABOUTME: Shows the status class and teardown plan for a machine status.

use nodelink::error::Result;
use nodelink::link::TeardownPlan;
use nodelink::output::Output;
use nodelink::status::{NodeStatus, classify as classify_status};
use serde::Serialize;

#[derive(Serialize)]
struct Classification {
    status: NodeStatus,
    class: nodelink::status::StatusClass,
    steps: Option<&'static [nodelink::link::TeardownStep]>,
}

pub fn classify(status: &str, output: &Output) -> Result<()> {
    let status = NodeStatus::parse(status);
    let class = classify_status(&status);
    let plan = TeardownPlan::for_class(class);

    let message = match plan {
        Some(plan) => format!("{status}: {class} (teardown: {plan})"),
        None => format!("{status}: {class} (teardown refused)"),
    };

    output.success_with(
        &message,
        &Classification {
            status,
            class,
            steps: plan.map(TeardownPlan::steps),
        },
    );
    Ok(())
}
