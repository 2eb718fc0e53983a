use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use client::types::{
    CreateApplication, CreateShipment, CreateTruck, CreateUser, Role, UpdateShipment, UpdateTruck,
    UpdateUser,
};
use client::{ApiClient, AuthContext, AuthError, AuthPhase, FileTokenStore, Session};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `haul-cli auth login` first")]
    NotLoggedIn,
    #[error("unknown role `{0}`; expected Admin, Merchant, TruckOwner or Driver")]
    UnknownRole(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] client::ApiError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "haul-cli", about = "Haulboard admin API CLI")]
struct Cli {
    #[arg(long, env = "HAUL_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "HAUL_TOKEN_FILE", default_value = ".haulboard-token.json")]
    token_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Auth(AuthCommand),
    User(UserCommand),
    Truck(TruckCommand),
    Shipment(ShipmentCommand),
    Application(ApplicationCommand),
}

#[derive(Args, Debug)]
struct AuthCommand {
    #[command(subcommand)]
    command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
enum AuthSubcommand {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
}

#[derive(Args, Debug)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Subcommand, Debug)]
enum UserSubcommand {
    List,
    Read {
        user_id: Uuid,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        role: String,
        #[arg(long)]
        phone: Option<String>,
    },
    Update {
        user_id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    Delete {
        user_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct TruckCommand {
    #[command(subcommand)]
    command: TruckSubcommand,
}

#[derive(Subcommand, Debug)]
enum TruckSubcommand {
    List,
    Read {
        truck_id: Uuid,
    },
    Create {
        #[arg(long)]
        owner_id: Uuid,
        #[arg(long)]
        plate_number: String,
        #[arg(long)]
        truck_type: String,
        #[arg(long)]
        capacity_kg: f64,
        #[arg(long)]
        status: Option<String>,
    },
    Update {
        truck_id: Uuid,
        #[arg(long)]
        plate_number: Option<String>,
        #[arg(long)]
        truck_type: Option<String>,
        #[arg(long)]
        capacity_kg: Option<f64>,
    },
    Status {
        truck_id: Uuid,
        status: String,
    },
    Delete {
        truck_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct ShipmentCommand {
    #[command(subcommand)]
    command: ShipmentSubcommand,
}

#[derive(Subcommand, Debug)]
enum ShipmentSubcommand {
    List,
    Read {
        shipment_id: Uuid,
    },
    Create {
        #[arg(long)]
        merchant_id: Uuid,
        #[arg(long)]
        origin: String,
        #[arg(long)]
        destination: String,
        #[arg(long, default_value = "")]
        cargo: String,
        #[arg(long)]
        weight_kg: f64,
        #[arg(long)]
        price: f64,
    },
    Update {
        shipment_id: Uuid,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        destination: Option<String>,
        #[arg(long)]
        cargo: Option<String>,
        #[arg(long)]
        weight_kg: Option<f64>,
        #[arg(long)]
        price: Option<f64>,
    },
    Status {
        shipment_id: Uuid,
        status: String,
    },
    Delete {
        shipment_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct ApplicationCommand {
    #[command(subcommand)]
    command: ApplicationSubcommand,
}

#[derive(Subcommand, Debug)]
enum ApplicationSubcommand {
    List {
        #[arg(long)]
        shipment_id: Option<Uuid>,
    },
    Read {
        application_id: Uuid,
    },
    Create {
        #[arg(long)]
        shipment_id: Uuid,
        #[arg(long)]
        truck_id: Uuid,
        #[arg(long)]
        bid_amount: f64,
    },
    Status {
        application_id: Uuid,
        status: String,
    },
    Delete {
        application_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    let session = Arc::new(Session::new(Box::new(FileTokenStore::new(cli.token_file))));
    let client = ApiClient::new(&cli.base_url, session)?;
    let auth = AuthContext::new(client.clone());

    match cli.command {
        Command::Ping => run_ping(&client).await,
        Command::Auth(auth_cmd) => run_auth(&auth, auth_cmd).await,
        Command::User(user) => {
            require_admin(&auth).await?;
            run_user(&client, user).await
        }
        Command::Truck(truck) => {
            require_admin(&auth).await?;
            run_truck(&client, truck).await
        }
        Command::Shipment(shipment) => {
            require_admin(&auth).await?;
            run_shipment(&client, shipment).await
        }
        Command::Application(application) => {
            require_admin(&auth).await?;
            run_application(&client, application).await
        }
    }
}

/// Resolve the stored session and refuse resource commands without an
/// authenticated admin.
async fn require_admin(auth: &AuthContext) -> Result<(), CliError> {
    auth.initialize().await;
    match auth.phase() {
        AuthPhase::Authenticated(_) => Ok(()),
        _ => Err(CliError::NotLoggedIn),
    }
}

fn parse_role(raw: &str) -> Result<Role, CliError> {
    Role::from_str(raw).ok_or_else(|| CliError::UnknownRole(raw.to_owned()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_ping(client: &ApiClient) -> Result<(), CliError> {
    client.get_json::<serde_json::Value>("/healthz").await?;
    println!("ok");
    Ok(())
}

async fn run_auth(auth: &AuthContext, cmd: AuthCommand) -> Result<(), CliError> {
    match cmd.command {
        AuthSubcommand::Login { email, password } => {
            let user = auth.login(&email, &password).await?;
            print_json(&user)
        }
        AuthSubcommand::Logout => {
            auth.logout().await;
            println!("logged out");
            Ok(())
        }
        AuthSubcommand::Whoami => {
            auth.initialize().await;
            match auth.current_user() {
                Some(user) => print_json(&user),
                None => Err(CliError::NotLoggedIn),
            }
        }
    }
}

async fn run_user(client: &ApiClient, cmd: UserCommand) -> Result<(), CliError> {
    match cmd.command {
        UserSubcommand::List => print_json(&client.list_users().await?),
        UserSubcommand::Read { user_id } => print_json(&client.get_user(user_id).await?),
        UserSubcommand::Create { name, email, password, role, phone } => {
            let body = CreateUser { name, email, password, role: parse_role(&role)?, phone };
            print_json(&client.create_user(&body).await?)
        }
        UserSubcommand::Update { user_id, name, phone, role, password } => {
            let role = role.as_deref().map(parse_role).transpose()?;
            let body = UpdateUser { name, phone, role, password };
            print_json(&client.update_user(user_id, &body).await?)
        }
        UserSubcommand::Delete { user_id } => {
            client.delete_user(user_id).await?;
            println!("deleted");
            Ok(())
        }
    }
}

async fn run_truck(client: &ApiClient, cmd: TruckCommand) -> Result<(), CliError> {
    match cmd.command {
        TruckSubcommand::List => print_json(&client.list_trucks().await?),
        TruckSubcommand::Read { truck_id } => print_json(&client.get_truck(truck_id).await?),
        TruckSubcommand::Create { owner_id, plate_number, truck_type, capacity_kg, status } => {
            let body = CreateTruck { owner_id, plate_number, truck_type, capacity_kg, status };
            print_json(&client.create_truck(&body).await?)
        }
        TruckSubcommand::Update { truck_id, plate_number, truck_type, capacity_kg } => {
            let body = UpdateTruck { plate_number, truck_type, capacity_kg };
            print_json(&client.update_truck(truck_id, &body).await?)
        }
        TruckSubcommand::Status { truck_id, status } => {
            print_json(&client.set_truck_status(truck_id, &status).await?)
        }
        TruckSubcommand::Delete { truck_id } => {
            client.delete_truck(truck_id).await?;
            println!("deleted");
            Ok(())
        }
    }
}

async fn run_shipment(client: &ApiClient, cmd: ShipmentCommand) -> Result<(), CliError> {
    match cmd.command {
        ShipmentSubcommand::List => print_json(&client.list_shipments().await?),
        ShipmentSubcommand::Read { shipment_id } => {
            print_json(&client.get_shipment(shipment_id).await?)
        }
        ShipmentSubcommand::Create { merchant_id, origin, destination, cargo, weight_kg, price } => {
            let body = CreateShipment { merchant_id, origin, destination, cargo, weight_kg, price };
            print_json(&client.create_shipment(&body).await?)
        }
        ShipmentSubcommand::Update { shipment_id, origin, destination, cargo, weight_kg, price } => {
            let body = UpdateShipment { origin, destination, cargo, weight_kg, price };
            print_json(&client.update_shipment(shipment_id, &body).await?)
        }
        ShipmentSubcommand::Status { shipment_id, status } => {
            print_json(&client.set_shipment_status(shipment_id, &status).await?)
        }
        ShipmentSubcommand::Delete { shipment_id } => {
            client.delete_shipment(shipment_id).await?;
            println!("deleted");
            Ok(())
        }
    }
}

async fn run_application(client: &ApiClient, cmd: ApplicationCommand) -> Result<(), CliError> {
    match cmd.command {
        ApplicationSubcommand::List { shipment_id } => {
            print_json(&client.list_applications(shipment_id).await?)
        }
        ApplicationSubcommand::Read { application_id } => {
            print_json(&client.get_application(application_id).await?)
        }
        ApplicationSubcommand::Create { shipment_id, truck_id, bid_amount } => {
            let body = CreateApplication { shipment_id, truck_id, bid_amount };
            print_json(&client.create_application(&body).await?)
        }
        ApplicationSubcommand::Status { application_id, status } => {
            print_json(&client.set_application_status(application_id, &status).await?)
        }
        ApplicationSubcommand::Delete { application_id } => {
            client.delete_application(application_id).await?;
            println!("deleted");
            Ok(())
        }
    }
}
