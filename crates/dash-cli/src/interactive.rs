//! Prompt loop: each answered ticker/start/end triple is one trigger

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use dash_stock::{Dashboard, MarketDataClient, ui};
use tracing::debug;

const BANNER: &str = r"
╔══════════════════════════════════════════════╗
║               Stock Analysis                 ║
║                                              ║
║  Enter a ticker, a start and an end date.    ║
║  Dates use the YYYY-MM-DD format.            ║
║  Type exit (or press Ctrl-D) to quit.        ║
╚══════════════════════════════════════════════╝
";

/// Read one trimmed line; `None` on end of input or an exit command
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Ok(None);
    }
    Ok(Some(line.to_string()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    raw.parse()
        .map_err(|_| format!("Invalid date {raw:?}, expected YYYY-MM-DD"))
}

/// Run the prompt loop until end of input or `exit`
pub async fn run<C, R, W>(dashboard: &Dashboard<C>, mut input: R, mut output: W) -> io::Result<()>
where
    C: MarketDataClient,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{BANNER}")?;

    loop {
        let Some(ticker) = prompt(&mut input, &mut output, "Ticker: ")? else {
            break;
        };
        if ticker.is_empty() {
            continue;
        }

        let Some(start) = prompt(&mut input, &mut output, "Start date: ")? else {
            break;
        };
        let Some(end) = prompt(&mut input, &mut output, "End date: ")? else {
            break;
        };

        let (start, end) = match (parse_date(&start), parse_date(&end)) {
            (Ok(start), Ok(end)) => (start, end),
            (Err(msg), _) | (_, Err(msg)) => {
                writeln!(output, "{msg}\n")?;
                continue;
            }
        };

        debug!(%ticker, %start, %end, "interactive trigger");
        let page = ui::render(&dashboard.trigger(&ticker, start, end).await);
        writeln!(output, "{}", ui::terminal::to_text(&page))?;
    }

    writeln!(output, "\nGoodbye!")?;
    Ok(())
}
