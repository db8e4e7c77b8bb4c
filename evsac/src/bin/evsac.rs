use clap::{
    Parser,
    Subcommand,
};
use evsac::{
    GateOptions,
    platform::Builder as PlatformBuilder,
    Platform,
};
use evscore::{
    ac::{
        Action,
        Resource,
        role::Role,
        traits::{
            AssignmentBackend,
            SiteUserRole,
        },
        user::UserToken,
    },
    entity::{
        Car,
        CarCatalog,
        ChargingStation,
        Company,
        Entity,
        RegistrationToken,
        Site,
        SiteArea,
        Tag,
        User,
    },
};
use evscore::platform::ConnectorOption;
use evsdb::Backend;
use evsrbac::Builder as EvsRbacBuilder;
use std::path::PathBuf;

#[derive(Debug, Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[clap(long, value_name = "EVSAC_DB_URL", env = "EVSAC_DB_URL")]
    evsac_db_url: String,
    /// A JSON policy replacing the default policy
    #[clap(long, value_name = "EVSAC_POLICY", env = "EVSAC_POLICY")]
    policy: Option<PathBuf>,
    /// Verify the static permissions through casbin
    #[cfg(feature = "casbin")]
    #[clap(long)]
    casbin: bool,
    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(arg_required_else_help = true)]
    Policy {
        #[command(subcommand)]
        cmd: PolicyCmd,
    },
    #[command(arg_required_else_help = true)]
    Site {
        tenant: String,
        site_id: String,
        #[command(subcommand)]
        cmd: SiteCmd,
    },
    /// Run the access gate on behalf of a user
    #[command(arg_required_else_help = true)]
    Check {
        tenant: String,
        user: String,
        #[arg(value_enum)]
        role: Role,
        #[arg(value_enum)]
        resource: Resource,
        #[arg(value_enum)]
        action: Action,
        id: String,
        /// Permit entities of external organizations
        #[arg(long)]
        allow_external: bool,
        /// Restrict the entity to the attributes of the grant
        #[arg(long)]
        project: bool,
    },
}

#[derive(Debug, Subcommand)]
enum PolicyCmd {
    /// Print the policy, or the permissions of a single role
    Show {
        #[arg(value_enum)]
        role: Option<Role>,
    },
    #[command(arg_required_else_help = true)]
    /// Print the grant governing the action
    Check {
        #[arg(value_enum)]
        role: Role,
        #[arg(value_enum)]
        resource: Resource,
        #[arg(value_enum)]
        action: Action,
    },
}

#[derive(Debug, Subcommand)]
enum SiteCmd {
    #[command(arg_required_else_help = true)]
    Assign {
        user_ids: Vec<String>,
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        owner: bool,
    },
    #[command(arg_required_else_help = true)]
    Unassign {
        user_ids: Vec<String>,
    },
    /// List the users assigned to the site
    Users,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    stderrlog::new()
        .module(module_path!())
        .module("evsac")
        .module("evsdb")
        .module("evsdb_sqlite")
        .module("evsrbac")
        .verbosity((args.verbose as usize) + 1)
        .timestamp(stderrlog::Timestamp::Second)
        .init()?;

    let rbac_builder = match args.policy.as_ref() {
        Some(path) => {
            log::info!("loading policy from {}", path.display());
            EvsRbacBuilder::new()
                .policy_json(&tokio::fs::read_to_string(path).await?)?
        }
        None => EvsRbacBuilder::new(),
    };
    #[cfg(feature = "casbin")]
    let rbac_builder = if args.casbin {
        rbac_builder.casbin(evsrbac::casbin::CasbinBuilder::new())
    } else {
        rbac_builder
    };

    let platform = PlatformBuilder::new()
        .storage(
            Backend::connect(
                ConnectorOption::from(args.evsac_db_url)
                    .create_db(true)
            )
                .await
                .map_err(anyhow::Error::from_boxed)?
        )
        .rbac_builder(rbac_builder)
        .build()
        .await?;

    match args.command {
        Commands::Policy { cmd } => {
            parse_policy(&platform, cmd)?;
        },
        Commands::Site { tenant, site_id, cmd } => {
            parse_site(&platform, &tenant, &site_id, cmd).await?;
        },
        Commands::Check { tenant, user, role, resource, action, id, allow_external, project } => {
            let options = GateOptions::default()
                .check_issuer(!allow_external)
                .apply_project_fields(project);
            let token = UserToken::new(&user, &tenant, role);
            match resource {
                Resource::Company => check::<Company>(&platform, token, &id, action, &options).await?,
                Resource::Site => check::<Site>(&platform, token, &id, action, &options).await?,
                Resource::SiteArea => check::<SiteArea>(&platform, token, &id, action, &options).await?,
                Resource::ChargingStation => check::<ChargingStation>(&platform, token, &id, action, &options).await?,
                Resource::User => check::<User>(&platform, token, &id, action, &options).await?,
                Resource::Car => check::<Car>(&platform, token, &id, action, &options).await?,
                Resource::CarCatalog => check::<CarCatalog>(&platform, token, &id, action, &options).await?,
                Resource::Tag => check::<Tag>(&platform, token, &id, action, &options).await?,
                Resource::RegistrationToken => check::<RegistrationToken>(&platform, token, &id, action, &options).await?,
            }
        },
    }

    Ok(())
}

fn parse_policy(
    platform: &Platform,
    arg: PolicyCmd,
) -> anyhow::Result<()> {
    let engine = platform.engine();
    match arg {
        PolicyCmd::Show { role: None } => {
            println!("{}", engine.policy().to_json()?);
        },
        PolicyCmd::Show { role: Some(role) } => {
            for (resource, action) in engine.policy().permissions(role) {
                println!("{resource}\t{action}");
            }
        },
        PolicyCmd::Check { role, resource, action } => {
            match engine.resolve_static(role, resource, action)? {
                Some(grant) => {
                    println!("{}", serde_json::to_string_pretty(grant)?);
                },
                None => {
                    println!("role {role} may not {action} on {resource}");
                },
            }
        },
    }
    Ok(())
}

async fn parse_site(
    platform: &Platform,
    tenant_id: &str,
    site_id: &str,
    arg: SiteCmd,
) -> anyhow::Result<()> {
    let tenant = platform.tenant(tenant_id);
    match arg {
        SiteCmd::Assign { user_ids, admin, owner } => {
            let role = SiteUserRole {
                site_admin: admin,
                site_owner: owner,
            };
            for user_id in user_ids.iter() {
                tenant.assign_site_user(site_id, user_id, role).await?;
                println!("assigned user {user_id} to site {site_id}");
            }
        },
        SiteCmd::Unassign { user_ids } => {
            for user_id in user_ids.iter() {
                if tenant.unassign_site_user(site_id, user_id).await? {
                    println!("unassigned user {user_id} from site {site_id}");
                } else {
                    println!("user {user_id} was not assigned to site {site_id}");
                }
            }
        },
        SiteCmd::Users => {
            for user_id in tenant.get_user_ids_for_sites(&[site_id.to_string()]).await? {
                println!("{user_id}");
            }
        },
    }
    Ok(())
}

async fn check<T: Entity>(
    platform: &Platform,
    user: UserToken,
    id: &str,
    action: Action,
    options: &GateOptions,
) -> anyhow::Result<()> {
    let authorizer = platform.authorizer(user);
    match authorizer.check_and_get::<T>(id, action, options).await {
        Ok(entity) => {
            println!("{}", serde_json::to_string_pretty(&entity)?);
        },
        Err(e) => {
            println!("denied: {e}");
        },
    }
    log::info!("data sources fetched: {:?}", authorizer.data_sources().fetched());
    Ok(())
}
