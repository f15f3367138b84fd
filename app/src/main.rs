//! FILENAME: app/src/main.rs
// PURPOSE: Command-line entry point. Prints screen snapshots as JSON.
// FORMAT: logs on stderr as seq|level|category|message

fn main() {
    dashboard_lib::run();
}
