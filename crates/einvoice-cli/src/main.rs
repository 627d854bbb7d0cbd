//! CLI application for Vietnamese e-invoice extraction.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use einvoice_core::{parse_commercial_invoice, InvoiceResult};

/// Extract structured data from Vietnamese/English commercial invoice PDFs
#[derive(Parser)]
#[command(name = "einvoice-lens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let result = parse_commercial_invoice(&cli.input)?;

    let output = match cli.format {
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Text => format_text(&result),
    };

    if let Some(output_path) = &cli.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_text(result: &InvoiceResult) -> String {
    let mut output = String::new();
    let attribute = &result.profile.attribute;

    output.push_str(&format!(
        "Invoice: {}\n",
        attribute.invoice_number.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!(
        "Serial:  {}\n",
        attribute.serial_no.as_deref().unwrap_or("-")
    ));
    if let Some(date) = attribute.issue_date {
        output.push_str(&format!("Date:    {}\n", date));
    }
    output.push('\n');

    output.push_str("Seller:\n");
    if let Some(name) = &result.profile.seller.name {
        output.push_str(&format!("  {}\n", name));
    }
    if let Some(tax_code) = &result.profile.seller.tax_code {
        output.push_str(&format!("  Tax code: {}\n", tax_code));
    }
    output.push('\n');

    output.push_str("Buyer:\n");
    if let Some(name) = &result.profile.buyer.name {
        output.push_str(&format!("  {}\n", name));
    }
    if let Some(company) = &result.profile.buyer.company {
        output.push_str(&format!("  {}\n", company));
    }
    if let Some(tax_code) = &result.profile.buyer.tax_code {
        output.push_str(&format!("  Tax code: {}\n", tax_code));
    }
    output.push('\n');

    output.push_str(&format!("Items ({}):\n", result.dataset.len()));
    for item in &result.dataset {
        output.push_str(&format!(
            "  {}. {} ({} {} x {}) = {}\n",
            item.no, item.product_description, item.quantity, item.unit, item.unit_price,
            item.amount
        ));
    }
    let total: f64 = result.dataset.iter().map(|i| i.amount).sum();
    output.push_str(&format!("Total: {}\n", total));

    output.push_str(&format!(
        "\nSource: {} ({} pages, {} MB, crc32c {})\n",
        result.runtime_metadata.source_path,
        result.runtime_metadata.total_pages,
        result.runtime_metadata.file_size_mb,
        result.runtime_metadata.checksum_crc32c
    ));

    output
}
