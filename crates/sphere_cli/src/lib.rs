//! Command-line interface for the Sphere GraphQL API.
//!
//! # Usage
//!
//! ```bash
//! # Print the query a lookup would send
//! sphere render get partner 1 --fields "id name contacts { email }"
//!
//! # Fetch one entity by id
//! sphere --url https://sphere.example.com/graphql get endCustomer 2 --fields "id name"
//!
//! # List entities matching every filter
//! sphere list subscription --fields "id status" --filter status:EQUALS:ACTIVE --per-page 20
//!
//! # Send a hand-written query
//! sphere raw '{selectOne { data { partner { id } } errors { message } }}'
//! ```

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use sphere_query::{
    Arguments, FilterGroup, FilterItem, FilterOperator, Operation, PaginationOptions, SelectQuery,
    Selector,
};
use sphere_schema::EntityTag;
use sphere_sdk::{
    unwrap_entity, unwrap_page, ClientConfig, RetryOnStatus, SdkError, SdkResult, SphereClient,
};
use std::time::Duration;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "sphere")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// GraphQL endpoint URL
    #[arg(long, global = true, env = "SPHERE_GRAPHQL_URL")]
    pub url: Option<String>,

    /// API key, sent as the `apiKey` header
    #[arg(long, global = true, env = "SPHERE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "SPHERE_TIMEOUT_SECS", default_value = "30")]
    pub timeout_secs: u64,

    /// Retry once when a request fails with this HTTP status
    #[arg(long = "retry-status", global = true)]
    pub retry_statuses: Vec<u16>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the query a lookup would send, without sending it
    Render {
        #[command(subcommand)]
        query: QueryCommand,
    },

    /// Fetch one entity by id
    Get(GetArgs),

    /// List entities
    List(ListArgs),

    /// Send a pre-built query and print its data
    Raw {
        /// The literal query string
        query: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum QueryCommand {
    Get(GetArgs),
    List(ListArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Entity name, e.g. `partner` or `endCustomer`
    pub entity: EntityTag,

    pub id: String,

    /// Selection set, e.g. "id name contacts { email }"
    #[arg(long, default_value = "id")]
    pub fields: Selector,

    #[arg(long)]
    pub page: Option<u64>,

    #[arg(long)]
    pub per_page: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Entity name, e.g. `partner` or `endCustomer`
    pub entity: EntityTag,

    /// Selection set, e.g. "id name contacts { email }"
    #[arg(long, default_value = "id")]
    pub fields: Selector,

    /// Filter as `name:OPERATOR:value1,value2`; repeated filters must all match
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<FilterItem>,

    #[arg(long)]
    pub page: Option<u64>,

    #[arg(long)]
    pub per_page: Option<u64>,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "sphere=debug"
        } else if self.quiet {
            "sphere=error"
        } else {
            "sphere=info"
        }
    }
}

impl GetArgs {
    pub fn query(&self) -> SelectQuery {
        let mut arguments = Arguments::by_id(&self.id);
        if let Some(pagination) = pagination(self.page, self.per_page) {
            arguments = arguments.paginate(pagination.or_first_page());
        }
        SelectQuery::select_one(self.entity, self.fields.clone()).arguments(arguments)
    }
}

impl ListArgs {
    pub fn query(&self) -> SelectQuery {
        let mut query = SelectQuery::select_all(self.entity, self.fields.clone())
            .with_all_pagination_fields();
        if !self.filters.is_empty() {
            query = query.filter(FilterGroup::from(self.filters.clone()));
        }
        if let Some(pagination) = pagination(self.page, self.per_page) {
            query = query.paginate(pagination);
        }
        query
    }
}

impl QueryCommand {
    pub fn query(&self) -> SelectQuery {
        match self {
            Self::Get(args) => args.query(),
            Self::List(args) => args.query(),
        }
    }
}

fn pagination(page: Option<u64>, per_page: Option<u64>) -> Option<PaginationOptions> {
    let options = PaginationOptions { page, per_page };
    (!options.is_empty()).then_some(options)
}

/// Parses `name:OPERATOR[:value1,value2,...]`.
pub fn parse_filter(raw: &str) -> Result<FilterItem, String> {
    let mut parts = raw.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("missing field name in filter `{raw}`"));
    }
    let operator: FilterOperator = parts
        .next()
        .ok_or_else(|| format!("missing operator in filter `{raw}`"))?
        .parse()
        .map_err(|e| format!("{e}"))?;
    let values: Vec<&str> = match parts.next() {
        Some(values) if !values.is_empty() => values.split(',').map(str::trim).collect(),
        _ => Vec::new(),
    };

    Ok(FilterItem::new(name, operator, values))
}

/// Renders an error the way the CLI prints it.
pub fn report(err: &SdkError) -> String {
    let message = match err {
        // Already rendered as `Error: <message>`.
        SdkError::ApiResponse { message } => message.clone(),
        other => other.to_string(),
    };
    format!("{} {}", "Error:".red().bold(), message)
}

fn client(cli: &Cli) -> SdkResult<SphereClient> {
    let url = cli
        .url
        .clone()
        .ok_or_else(|| SdkError::Config("no URL given; use --url or SPHERE_GRAPHQL_URL".into()))?;

    let mut config = ClientConfig::new(url).timeout(Duration::from_secs(cli.timeout_secs));
    if let Some(key) = &cli.api_key {
        config = config.api_key(key.as_str());
    }

    let mut client = SphereClient::with_config(config)?;
    if !cli.retry_statuses.is_empty() {
        client.register_http_exception_handler(RetryOnStatus::new(cli.retry_statuses.clone()));
    }
    Ok(client)
}

fn print_json(value: &impl serde::Serialize) -> SdkResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(cli: Cli) -> SdkResult<i32> {
    match &cli.command {
        Commands::Render { query } => {
            println!("{}", query.query().build()?);
            Ok(0)
        }
        Commands::Get(args) => {
            let query = args.query().build()?;
            if cli.verbose {
                eprintln!("{} {}", "Query".blue(), query);
            }
            let client = client(&cli)?;
            let envelope: Option<Value> = client.try_find(&query).await?;
            let entity: Option<Value> = unwrap_entity(envelope, Operation::SelectOne, args.entity)?;
            debug!(found = entity.is_some(), "entity lookup finished");

            print_json(&entity)?;
            Ok(if entity.is_some() { 0 } else { 2 })
        }
        Commands::List(args) => {
            let query = args.query().build()?;
            if cli.verbose {
                eprintln!("{} {}", "Query".blue(), query);
            }
            let client = client(&cli)?;
            let envelope: Option<Value> = client.try_find(&query).await?;
            let page = unwrap_page::<Value>(envelope, args.entity)?;
            if !cli.quiet {
                if let Some(page) = &page {
                    eprintln!("{} {} item(s)", "Fetched".green(), page.len());
                }
            }

            print_json(&page)?;
            Ok(0)
        }
        Commands::Raw { query } => {
            let client = client(&cli)?;
            let data: Option<Value> = client.try_find(query).await?;
            print_json(&data)?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_filter() {
        let item = parse_filter("id:in:10,11").unwrap();
        assert_eq!(item, FilterItem::new("id", FilterOperator::In, [10, 11]));

        let item = parse_filter("name:CONTAINS:Arrow").unwrap();
        assert_eq!(item.value, vec!["Arrow"]);

        let item = parse_filter("deletedAt:IS_NULL").unwrap();
        assert!(item.value.is_empty());

        assert!(parse_filter("id").is_err());
        assert!(parse_filter(":EQUALS:1").is_err());
        assert!(parse_filter("id:ALMOST:1").is_err());
    }

    #[test]
    fn test_render_get() {
        let cli = Cli::try_parse_from([
            "sphere", "render", "get", "partner", "1", "--fields", "id name", "--per-page", "1",
        ])
        .unwrap();
        let Commands::Render { query } = cli.command else {
            panic!("expected render");
        };

        assert_eq!(
            query.query().build().unwrap(),
            r#"{selectOne (filters: {groups: [{items: [{name: "id", operator: "EQUALS", value: ["1"]}]}]}, pagination: {page: 1, perPage: 1}) { data { partner { id name } } errors { message } }}"#
        );
    }

    #[test]
    fn test_list_filters_form_one_group() {
        let cli = Cli::try_parse_from([
            "sphere",
            "list",
            "end-customer",
            "--fields",
            "id, name",
            "--filter",
            "active:EQUALS:true",
            "--filter",
            "name:CONTAINS:Arrow",
        ])
        .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };

        assert_eq!(args.entity, EntityTag::EndCustomer);
        let query = args.query();
        assert_eq!(query.arguments.filters.len(), 1);
        assert_eq!(query.arguments.filters[0].items.len(), 2);
        assert!(query.build().unwrap().starts_with(
            r#"{selectAll (filters: {groups: [{items: [{name: "active", operator: "EQUALS", value: ["true"]}, {name: "name", operator: "CONTAINS", value: ["Arrow"]}]}]}) { data { endCustomer { id name } }"#
        ));
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "sphere",
            "raw",
            "{}",
            "--url",
            "http://localhost:4000/graphql",
            "--retry-status",
            "401",
            "--retry-status",
            "503",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.url.as_deref(), Some("http://localhost:4000/graphql"));
        assert_eq!(cli.retry_statuses, vec![401, 503]);
        assert_eq!(cli.default_log_filter(), "sphere=debug");
    }

    #[test]
    fn test_unknown_entity_rejected() {
        assert!(Cli::try_parse_from(["sphere", "get", "invoice", "1"]).is_err());
    }

    #[test]
    fn test_report() {
        colored::control::set_override(false);
        assert_eq!(report(&SdkError::api_response("Bad query")), "Error: Bad query");
        assert_eq!(
            report(&SdkError::Config("no URL".into())),
            "Error: invalid configuration: no URL"
        );
    }
}
