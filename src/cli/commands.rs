use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::{
    cli::{
        context::{CliMode, CommandError, CommandResult, ShellContext},
        output,
        registry::{CommandEntry, CommandRegistry},
    },
    core::{
        services::SummaryService,
        time::{Clock, SystemClock},
    },
    ledger::{DateRange, EntryKind, PeriodWindow, TenantId},
    remarks::PaymentRemark,
    utils::build_info,
};

pub fn register_all(registry: &mut CommandRegistry) {
    registry.register(CommandEntry {
        name: "help",
        aliases: &["?"],
        description: "List commands or show usage for one command.",
        usage: "help [command]",
        handler: cmd_help,
    });
    registry.register(CommandEntry {
        name: "tenant",
        aliases: &["school"],
        description: "Show, switch, or list tenant ledgers.",
        usage: "tenant [name | list]",
        handler: cmd_tenant,
    });
    registry.register(CommandEntry {
        name: "gain",
        aliases: &["income"],
        description: "Record a gain.",
        usage: "gain <amount> [remark...] [--at YYYY-MM-DD|RFC3339]",
        handler: cmd_gain,
    });
    registry.register(CommandEntry {
        name: "loss",
        aliases: &["expense"],
        description: "Record a loss.",
        usage: "loss <amount> [remark...] [--at YYYY-MM-DD|RFC3339]",
        handler: cmd_loss,
    });
    registry.register(CommandEntry {
        name: "pay",
        aliases: &["payment"],
        description: "Record a student payment with a structured remark.",
        usage: "pay <amount> <receipt-id> <student> [--group NAME]... [--month M/YYYY]...",
        handler: cmd_pay,
    });
    registry.register(CommandEntry {
        name: "list",
        aliases: &["ls"],
        description: "List entries with their remark tags, newest first.",
        usage: "list [today | week | month | year | all]",
        handler: cmd_list,
    });
    registry.register(CommandEntry {
        name: "summary",
        aliases: &["balances"],
        description: "Show balances for today, 7 days, 30 days, this year, and all time.",
        usage: "summary",
        handler: cmd_summary,
    });
    registry.register(CommandEntry {
        name: "balance",
        aliases: &[],
        description: "Balance of a custom date range (inclusive days, `-` leaves a side open).",
        usage: "balance <from|-> [to]",
        handler: cmd_balance,
    });
    registry.register(CommandEntry {
        name: "tags",
        aliases: &[],
        description: "Show the tags extracted from a remark.",
        usage: "tags <remark...>",
        handler: cmd_tags,
    });
    registry.register(CommandEntry {
        name: "reset",
        aliases: &[],
        description: "Remove every entry of the current tenant (a backup is kept).",
        usage: "reset --yes",
        handler: cmd_reset,
    });
    registry.register(CommandEntry {
        name: "config",
        aliases: &[],
        description: "Show or change settings.",
        usage: "config [show | set <key> <value>]",
        handler: cmd_config,
    });
    registry.register(CommandEntry {
        name: "version",
        aliases: &[],
        description: "Print build information.",
        usage: "version",
        handler: cmd_version,
    });
    registry.register(CommandEntry {
        name: "exit",
        aliases: &["quit"],
        description: "Leave the shell.",
        usage: "exit",
        handler: cmd_exit,
    });
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        let entry = context
            .registry
            .get(&name.to_lowercase())
            .ok_or_else(|| CommandError::InvalidArguments(format!("no command named `{name}`")))?;
        output::info(format!("{} - {}", entry.name, entry.description));
        output::info(format!("usage: {}", entry.usage));
        return Ok(());
    }
    output::section("Commands");
    for entry in context.registry.list() {
        output::info(format!("  {:<10} {}", entry.name, entry.description));
    }
    if context.mode == CliMode::Interactive {
        output::hint("Tab completes command names.");
    }
    Ok(())
}

fn cmd_tenant(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => output::info(format!("Current tenant: {}", context.tenant)),
        ["list"] => {
            let tenants = context.service.tenants()?;
            if tenants.is_empty() {
                output::info("No ledgers recorded yet.");
            }
            for tenant in tenants {
                let marker = if tenant == context.tenant { "*" } else { " " };
                output::info(format!("{marker} {tenant}"));
            }
        }
        name => {
            context.tenant = TenantId::new(&name.join(" "))?;
            output::success(format!("Switched to tenant `{}`.", context.tenant));
        }
    }
    Ok(())
}

fn cmd_gain(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record(context, EntryKind::Gain, args)
}

fn cmd_loss(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    record(context, EntryKind::Loss, args)
}

fn record(context: &mut ShellContext, kind: EntryKind, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["--at"])?;
    let (amount, remark) = positional
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {kind} <amount> [remark...]")))?;
    let amount = parse_amount(amount)?;
    let created_at = match option_value(&options, "--at") {
        Some(raw) => parse_timestamp(raw)?,
        None => SystemClock.now_utc(),
    };
    let entry = context
        .service
        .record(&context.tenant, kind, amount, &remark.join(" "), created_at)?;
    output::success(format!(
        "Recorded {} of {} ({}).",
        kind,
        context.amounts.format(entry.amount),
        entry.id
    ));
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (positional, options) = split_options(args, &["--group", "--month"])?;
    let [amount, receipt, student @ ..] = positional.as_slice() else {
        return Err(CommandError::InvalidArguments(
            "usage: pay <amount> <receipt-id> <student> [--group NAME]... [--month M/YYYY]...".into(),
        ));
    };
    if student.is_empty() {
        return Err(CommandError::InvalidArguments("a student name is required".into()));
    }
    let amount = parse_amount(amount)?;
    let mut payment = PaymentRemark::new(*receipt, student.join(" "));
    for (flag, value) in &options {
        payment = match *flag {
            "--group" => payment.with_group(*value),
            _ => {
                let (month, year) = parse_billing_month(value)?;
                payment.with_month(month, year)
            }
        };
    }
    let entry = context.service.record_payment(
        &context.tenant,
        amount,
        &payment,
        context.tagger.vocabulary(),
        &SystemClock,
    )?;
    output::success(format!(
        "Recorded payment of {}.",
        context.amounts.format(entry.amount)
    ));
    output::info(output::tag_line(&context.tagger.extract(&entry.remarks)));
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let window = match args.first() {
        Some(raw) => PeriodWindow::parse(raw)
            .ok_or_else(|| CommandError::InvalidArguments(format!("unknown window `{raw}`")))?,
        None => PeriodWindow::AllTime,
    };
    let now = SystemClock.now();
    let entries: Vec<_> = context
        .service
        .entries(&context.tenant)?
        .into_iter()
        .filter(|entry| window.contains(&entry.created_at, &now))
        .collect();
    output::section(format!("{} entries ({})", context.tenant, window));
    if entries.is_empty() {
        output::info("No entries.");
        return Ok(());
    }
    for row in SummaryService::tagged_entries(&entries, &context.tagger) {
        let signed = row.entry.signed_amount();
        output::info(format!(
            "{}  {:<4} {:>20}  {}",
            row.entry.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
            row.entry.kind,
            output::signed(signed, context.amounts.format_signed(signed)),
            output::tag_line(&row.tags)
        ));
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let entries = context.service.entries(&context.tenant)?;
    let balances = SummaryService::period_balances(&entries, &SystemClock);
    output::section(format!("Balances for {}", context.tenant));
    for (window, totals) in balances.iter() {
        output::info(format!(
            "{:<14} {:>20}   gains {} / losses {} / {} entries",
            window.label(),
            output::signed(totals.balance, context.amounts.format(totals.balance)),
            context.amounts.format(totals.gains),
            context.amounts.format(totals.losses),
            totals.entry_count
        ));
    }
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (from, to) = match args {
        [from] => (parse_open_date(from)?, None),
        [from, to] => (parse_open_date(from)?, parse_open_date(to)?),
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: balance <from|-> [to]".into(),
            ))
        }
    };
    let range = DateRange::from_dates(&Local, from, to)?;
    let entries = context.service.entries(&context.tenant)?;
    let totals = SummaryService::range_totals(&entries, &range);
    let describe = |day: Option<NaiveDate>| day.map_or_else(|| "...".to_string(), |d| d.to_string());
    output::info(format!(
        "Balance {} .. {}: {} ({} entries)",
        describe(from),
        describe(to),
        output::signed(totals.balance, context.amounts.format(totals.balance)),
        totals.entry_count
    ));
    Ok(())
}

fn cmd_tags(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::InvalidArguments("usage: tags <remark...>".into()));
    }
    for tag in context.tagger.extract(&args.join(" ")) {
        output::info(output::tag_chip(&tag));
    }
    Ok(())
}

fn cmd_reset(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args != ["--yes"] {
        output::warning(format!(
            "This removes every entry of `{}`. Re-run as `reset --yes` to confirm.",
            context.tenant
        ));
        return Ok(());
    }
    let removed = context.service.reset(&context.tenant)?;
    output::success(format!(
        "Removed {removed} entries from `{}`.",
        context.tenant
    ));
    Ok(())
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => {
            output::section("Configuration");
            output::info(format!("  locale            {}", context.config.locale));
            output::info(format!("  currency          {}", context.config.currency));
            output::info(format!(
                "  default_tenant    {}",
                context.config.default_tenant.as_deref().unwrap_or("-")
            ));
            output::info(format!(
                "  backup_retention  {}",
                context.config.backup_retention
            ));
            output::info(format!(
                "  vocabulary        {}",
                if context.config.vocabulary.is_some() { "custom" } else { "built-in" }
            ));
            output::hint(format!("file: {}", context.config_manager.path().display()));
            Ok(())
        }
        ["set", key, value @ ..] if !value.is_empty() => {
            let mut config = context.config.clone();
            config.set(key, &value.join(" "))?;
            context.apply_config(config)?;
            output::success(format!("Updated `{key}`."));
            if *key == "backup_retention" {
                output::hint("The new retention applies from the next session.");
            }
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "usage: config [show | set <key> <value>]".into(),
        )),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let build = build_info::current();
    output::info(build.summary());
    output::hint(format!("rustc: {}", build.rustc));
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}

type Options<'a> = Vec<(&'a str, &'a str)>;

/// Separates `--flag value` pairs (only the listed flags) from positional
/// arguments.
fn split_options<'a>(
    args: &[&'a str],
    flags: &[&str],
) -> Result<(Vec<&'a str>, Options<'a>), CommandError> {
    let mut positional = Vec::new();
    let mut options = Vec::new();
    let mut iter = args.iter();
    while let Some(&arg) = iter.next() {
        if flags.contains(&arg) {
            let value = iter
                .next()
                .ok_or_else(|| CommandError::InvalidArguments(format!("{arg} needs a value")))?;
            options.push((arg, *value));
        } else {
            positional.push(arg);
        }
    }
    Ok((positional, options))
}

fn option_value<'a>(options: &Options<'a>, flag: &str) -> Option<&'a str> {
    options
        .iter()
        .rev()
        .find(|(name, _)| *name == flag)
        .map(|(_, value)| *value)
}

pub(crate) fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let cleaned: String = raw.chars().filter(|ch| !matches!(ch, ',' | '_')).collect();
    let amount: f64 = cleaned
        .parse()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a valid amount")))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(CommandError::InvalidArguments(format!(
            "amount must be zero or positive, got `{raw}`"
        )));
    }
    Ok(amount)
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a YYYY-MM-DD date")))
}

fn parse_open_date(raw: &str) -> Result<Option<NaiveDate>, CommandError> {
    if raw == "-" {
        Ok(None)
    } else {
        parse_date(raw).map(Some)
    }
}

/// `YYYY-MM-DD` (local midnight) or a full RFC 3339 timestamp.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    let day = parse_date(raw)?;
    let range = DateRange::from_dates(&Local, Some(day), None)?;
    range
        .start
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{raw}` has no start")))
}

fn parse_billing_month(raw: &str) -> Result<(u32, i32), CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("`{raw}` is not a M/YYYY month"));
    let (month, year) = raw.split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((month, year))
}
