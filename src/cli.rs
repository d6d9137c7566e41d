use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::net::IpAddr;
use tracing::info;

use crate::api::run_http_server;
use crate::core::{
    DurationSolution, InvestmentInputs, InvestmentProjection, InvestmentType, OneYearGains,
    PayPeriod, future_value, one_year_gains, solve_duration, take_home_pay,
};
use crate::error::Result;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliPayPeriod {
    Weekly,
    #[value(alias = "fortnightly")]
    Biweekly,
    Monthly,
    Yearly,
}

impl From<CliPayPeriod> for PayPeriod {
    fn from(value: CliPayPeriod) -> Self {
        match value {
            CliPayPeriod::Weekly => PayPeriod::Weekly,
            CliPayPeriod::Biweekly => PayPeriod::Biweekly,
            CliPayPeriod::Monthly => PayPeriod::Monthly,
            CliPayPeriod::Yearly => PayPeriod::Yearly,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "finance-dashboard",
    about = "Personal finance dashboard: Australian take-home pay and investment growth"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Log filter directive when RUST_LOG is unset, e.g. debug or finance_dashboard=trace"
    )]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the browser dashboard and its JSON API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "127.0.0.1")]
        bind: IpAddr,
    },
    /// Income tax and take-home pay for an amount earned every period
    Tax {
        #[arg(long)]
        amount: f64,
        #[arg(long, value_enum, default_value_t = CliPayPeriod::Yearly)]
        period: CliPayPeriod,
    },
    /// Project an investment forward by a number of years
    Project {
        #[command(flatten)]
        investment: InvestmentArgs,
        #[arg(long, help = "Years to project; fractions allowed")]
        years: f64,
    },
    /// Years needed for an investment to reach a target value
    Duration {
        #[command(flatten)]
        investment: InvestmentArgs,
        #[arg(long)]
        target: f64,
    },
}

#[derive(Args, Debug)]
pub struct InvestmentArgs {
    #[arg(long, default_value_t = 0.0)]
    start: f64,
    #[arg(long, default_value_t = 0.0, help = "Amount contributed every period")]
    contrib: f64,
    #[arg(long, value_enum, default_value_t = CliPayPeriod::Monthly)]
    period: CliPayPeriod,
    #[arg(
        long = "type",
        default_value = "vdhg",
        help = "vdhg, asx200, sp500, gold, bitcoin or cash; anything else grows at 0%"
    )]
    investment_type: String,
}

impl From<&InvestmentArgs> for InvestmentInputs {
    fn from(args: &InvestmentArgs) -> Self {
        InvestmentInputs {
            starting_amount: args.start,
            periodic_amount: args.contrib,
            pay_period: args.period.into(),
            investment: InvestmentType::from_id(&args.investment_type),
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Serve { port, bind } => run_http_server(bind, port).await,
        Command::Tax { amount, period } => print_json(&take_home_pay(Some(amount), period.into())),
        Command::Project { investment, years } => {
            let inputs = InvestmentInputs::from(&investment);
            info!(investment = inputs.investment.id(), years, "projecting investment");
            print_json(&ProjectOutput {
                one_year: one_year_gains(&inputs),
                projection: future_value(&inputs, years),
            })
        }
        Command::Duration { investment, target } => {
            let inputs = InvestmentInputs::from(&investment);
            info!(investment = inputs.investment.id(), target, "solving for duration");
            let duration = solve_duration(&inputs, target);
            print_json(&DurationOutput {
                projection: future_value(&inputs, duration.years),
                duration,
            })
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectOutput {
    one_year: OneYearGains,
    projection: InvestmentProjection,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DurationOutput {
    duration: DurationSolution,
    projection: InvestmentProjection,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_subcommand_parses_investment_flags() {
        let cli = Cli::try_parse_from([
            "finance-dashboard",
            "duration",
            "--start",
            "5000",
            "--contrib",
            "250",
            "--period",
            "fortnightly",
            "--type",
            "bitcoin",
            "--target",
            "100000",
        ])
        .expect("args should parse");

        let Command::Duration { investment, target } = cli.command else {
            panic!("expected duration subcommand");
        };
        let inputs = InvestmentInputs::from(&investment);
        assert_eq!(target, 100_000.0);
        assert_eq!(inputs.pay_period, PayPeriod::Biweekly);
        assert_eq!(inputs.investment, InvestmentType::Bitcoin);
        assert_eq!(inputs.starting_amount, 5_000.0);
    }

    #[test]
    fn serve_defaults_to_loopback() {
        let cli = Cli::try_parse_from(["finance-dashboard", "serve", "--log-level", "debug"])
            .expect("args should parse");
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        let Command::Serve { port, bind } = cli.command else {
            panic!("expected serve subcommand");
        };
        assert_eq!(port, 8080);
        assert_eq!(bind, IpAddr::from([127, 0, 0, 1]));
    }

    #[test]
    fn tax_subcommand_rejects_unknown_period() {
        let result = Cli::try_parse_from([
            "finance-dashboard",
            "tax",
            "--amount",
            "1000",
            "--period",
            "hourly",
        ]);
        assert!(result.is_err());
    }
}
