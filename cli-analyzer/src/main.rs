use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use serde_json::json;
use statements::{
    analytics, parse_statement, Bank, ClockPicker, StatementText, StoredTransaction,
};

#[derive(Parser, Debug)]
#[command(
    name = "cli_analyzer",
    version,
    about = "Разбирает банковскую выписку, категоризирует операции и печатает JSON.",
    long_about = None,
)]
struct Args {
    /// Входной файл: PDF или уже извлечённый текст
    #[arg(long)]
    input: PathBuf,

    /// Банк, выдавший выписку
    #[arg(long, value_enum)]
    bank: BankArg,

    /// Посчитать аналитику по разобранным операциям
    #[arg(long)]
    analytics: bool,

    /// Опорная дата аналитики в формате DD.MM.YYYY (по умолчанию — сегодня)
    #[arg(long)]
    now: Option<String>,
}

/// Поддерживаемые банки для CLI
#[derive(Copy, Clone, Debug, ValueEnum)]
enum BankArg {
    Tbank,
    Sber,
}

impl From<BankArg> for Bank {
    fn from(arg: BankArg) -> Self {
        match arg {
            BankArg::Tbank => Bank::Tbank,
            BankArg::Sber => Bank::Sber,
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let bank = Bank::from(args.bank);

    let text = load_text(&args.input)?;
    let parsed = parse_statement(bank, &text)?;

    println!("{}", serde_json::to_string_pretty(&parsed)?);

    if args.analytics {
        let now = match &args.now {
            Some(raw) => NaiveDate::parse_from_str(raw, "%d.%m.%Y")
                .with_context(|| format!("bad --now date: {raw}"))?,
            None => Local::now().date_naive(),
        };

        let stored: Vec<StoredTransaction> = parsed
            .transactions
            .iter()
            .enumerate()
            .map(|(i, tx)| StoredTransaction {
                id: i as i64 + 1,
                date: tx.date.format("%d.%m.%Y").to_string(),
                time: tx.time.map(|t| t.format("%H:%M").to_string()),
                amount: tx.amount,
                description: tx.description.clone(),
                category: tx.category,
                bank,
                statement_id: None,
            })
            .collect();

        let report = json!({
            "categoryStats": analytics::category_stats(&stored, now),
            "monthlyStats": analytics::monthly_stats(&stored, now),
            "incomeStats": analytics::income_stats(&stored, now),
            "advice": analytics::monthly_advice(&stored, now, &ClockPicker),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(())
}

/// PDF уходит в pdf-extract, всё остальное читается как готовый текст.
/// Постраничную структуру извлечённый текст теряет, поэтому документ
/// подаётся в библиотеку одной страницей.
fn load_text(path: &Path) -> anyhow::Result<StatementText> {
    anyhow::ensure!(path.exists(), "input file does not exist: {}", path.display());

    let is_pdf = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    let raw = if is_pdf {
        pdf_extract::extract_text(path)
            .with_context(|| format!("failed to extract text from {}", path.display()))?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display()))?
    };

    Ok(StatementText::from_text(&raw))
}
