//! Startup banner helpers.
//!
//! Used by [`ServiceLocator::initialize_all`](crate::core::registry::ServiceLocator::initialize_all)
//! to show registry progress on the terminal, independently of the log filter.

const BOX_WIDTH: usize = 50;

/// Prints `title` centred inside a double-line box.
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║         🔄 INITIALIZING SERVICE REGISTRY         ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);
    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// One indented line under the current step.
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

pub fn print_final_summary(repositories: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SHOP REGISTRY READY");
    println!("   📦 Repositories: {}", repositories);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repositories + services);
    println!();
}
