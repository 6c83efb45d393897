//! Pings the Binance spot API, prints the server time, and (when `BINANCE_API_KEY` and
//! `BINANCE_API_SECRET` are set) fetches the account's trading permissions with a signed call.
//!
//! ```sh
//! cargo run --example ping
//! BINANCE_API_KEY=... BINANCE_API_SECRET=... cargo run --example ping
//! ```

// std
use std::{
	env,
	time::{SystemTime, UNIX_EPOCH},
};
// crates.io
use color_eyre::Result;
use serde::Deserialize;
// self
use binance_rest_binder::{
	auth::Credentials,
	binder::ServiceBinder,
	service::{ApiService, Call, Endpoint, ServiceClient},
};

#[derive(Debug, Deserialize)]
struct ServerTime {
	#[serde(rename = "serverTime")]
	server_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Account {
	can_trade: bool,
	can_withdraw: bool,
	account_type: String,
}

struct General(ServiceClient);
impl General {
	const ACCOUNT: Endpoint = Endpoint::get("/api/v3/account").signed();
	const PING: Endpoint = Endpoint::get("/api/v3/ping");
	const TIME: Endpoint = Endpoint::get("/api/v3/time");

	fn ping(&self) -> Call<serde_json::Value> {
		self.0.call(Self::PING)
	}

	fn time(&self) -> Call<ServerTime> {
		self.0.call(Self::TIME)
	}

	fn account(&self, timestamp: u128) -> Call<Account> {
		self.0.call(Self::ACCOUNT).param("recvWindow", 5_000).param("timestamp", timestamp)
	}
}
impl ApiService for General {
	fn from_client(client: ServiceClient) -> Self {
		Self(client)
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let binder = ServiceBinder::new()?;
	let credentials = Credentials::from_parts(
		env::var("BINANCE_API_KEY").ok().as_deref(),
		env::var("BINANCE_API_SECRET").ok().as_deref(),
	)?;
	let general: General = binder.bind_optional(credentials.as_ref())?;

	general.ping().execute()?;

	println!("server time: {}", general.time().execute()?.server_time);

	if credentials.is_some() {
		let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis();
		let account = general.account(now).execute()?;

		println!(
			"account type: {}, can trade: {}, can withdraw: {}",
			account.account_type, account.can_trade, account.can_withdraw
		);
	}

	Ok(())
}
