//! `mailpilot tools`: list the email tools offered to the model.

use mailpilot_tools::MailTool;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("📬 MailPilot tools ({})", MailTool::ALL.len());
    println!("========================\n");

    for tool in MailTool::ALL {
        println!("  {}", tool.name());
        println!("      {}", tool.description());
        let required = tool.required_params();
        if required.is_empty() {
            println!("      required: (none)");
        } else {
            println!("      required: {}", required.join(", "));
        }
        println!();
    }

    Ok(())
}
