//! Storefront subcommands and their rendering.

use bakery_core::forms::{self, FEEDBACK_SUCCESS, SUBSCRIBE_SUCCESS};
use bakery_core::{OrderStateError, Storefront};
use bakery_types::{format_usd, CustomOrderField, Product};
use clap::{Args, Subcommand};
use std::collections::BTreeMap;
use std::io::Write;
use thiserror::Error;

/// Errors that abort a command.
///
/// Rejections the customer can act on (incomplete forms, nothing to order)
/// are printed as messages instead.
#[derive(Debug, Error)]
pub enum CommandError {
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	#[error(transparent)]
	OrderState(#[from] OrderStateError),
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// List products
	Products {
		/// Only show products whose name contains this text
		#[arg(short, long)]
		search: Option<String>,
		/// Only show featured products
		#[arg(long, conflicts_with = "search")]
		featured: bool,
	},
	/// Show or edit the cart
	#[command(subcommand)]
	Cart(CartCommand),
	/// Save or show this session's custom order
	#[command(subcommand)]
	Custom(CustomCommand),
	/// Submit the order for this session
	Checkout,
	/// Manage the browsing session
	#[command(subcommand)]
	Session(SessionCommand),
	/// Subscribe to the newsletter
	Subscribe { email: String },
	/// Send feedback
	Feedback {
		#[arg(long)]
		name: String,
		#[arg(long)]
		email: String,
		#[arg(long)]
		message: String,
	},
}

#[derive(Subcommand, Debug)]
pub enum CartCommand {
	/// Show cart contents and total
	Show,
	/// Add one unit of a product
	Add { product_id: String },
	/// Remove a product from the cart
	Remove { product_id: String },
	/// Empty the cart
	Clear {
		/// Do not ask for confirmation
		#[arg(short, long)]
		yes: bool,
	},
}

#[derive(Subcommand, Debug)]
pub enum CustomCommand {
	/// Save a custom order, replacing any saved one
	Save(CustomOrderArgs),
	/// Show the saved custom order
	Show,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
	/// End the session, forgetting the custom order and the processed order
	End,
}

/// Custom order form fields. Missing fields are reported by validation.
#[derive(Args, Debug, Default)]
pub struct CustomOrderArgs {
	#[arg(long, default_value = "")]
	pub size: String,
	#[arg(long, default_value = "")]
	pub flavor: String,
	#[arg(long, default_value = "")]
	pub frosting: String,
	#[arg(long, default_value = "")]
	pub pickup_date: String,
	#[arg(long, default_value = "")]
	pub notes: String,
}

impl CustomOrderArgs {
	fn into_fields(self) -> BTreeMap<String, String> {
		[
			(CustomOrderField::Size, self.size),
			(CustomOrderField::Flavor, self.flavor),
			(CustomOrderField::Frosting, self.frosting),
			(CustomOrderField::PickupDate, self.pickup_date),
			(CustomOrderField::Notes, self.notes),
		]
		.into_iter()
		.map(|(field, value)| (field.as_str().to_string(), value))
		.collect()
	}
}

/// Runs a command against the storefront, writing output to `out`.
///
/// `confirm` is asked before destructive actions.
pub async fn execute<W, C>(
	command: Command,
	store: &Storefront,
	out: &mut W,
	confirm: &mut C,
) -> Result<(), CommandError>
where
	W: Write,
	C: FnMut(&str) -> std::io::Result<bool>,
{
	let orders = store.orders();

	match command {
		Command::Products { search, featured } => {
			let catalog = store.catalog();
			let products: Vec<&Product> = if featured {
				catalog.featured().iter().collect()
			} else {
				catalog.search(search.as_deref().unwrap_or(""))
			};
			if products.is_empty() {
				writeln!(out, "No products match your search.")?;
			}
			for product in products {
				writeln!(
					out,
					"{:<28} {:>8}  {}",
					product.name,
					format_usd(product.price),
					product.id
				)?;
			}
		},
		Command::Cart(CartCommand::Show) => render_cart(store, out).await?,
		Command::Cart(CartCommand::Add { product_id }) => {
			if store.catalog().find(&product_id).is_none() {
				writeln!(out, "Unknown product: {}", product_id)?;
				return Ok(());
			}
			orders.add_item(&product_id).await?;
			writeln!(out, "Added to cart! ({} items)", orders.cart_item_count().await)?;
		},
		Command::Cart(CartCommand::Remove { product_id }) => {
			orders.remove_item(&product_id).await?;
			render_cart(store, out).await?;
		},
		Command::Cart(CartCommand::Clear { yes }) => {
			if !yes && !confirm("Are you sure you want to clear the cart?")? {
				writeln!(out, "Cart left unchanged.")?;
				return Ok(());
			}
			orders.clear_cart().await?;
			writeln!(out, "Cart cleared!")?;
		},
		Command::Custom(CustomCommand::Save(args)) => {
			match orders.save_custom_order(&args.into_fields()).await {
				Ok(_) => writeln!(out, "Custom order saved for this session!")?,
				Err(OrderStateError::Validation(e)) => writeln!(out, "{}", e)?,
				Err(e) => return Err(e.into()),
			}
		},
		Command::Custom(CustomCommand::Show) => render_custom_order(store, out).await?,
		Command::Checkout => {
			let result = orders.submit_order().await?;
			writeln!(out, "{}", result.message())?;
			if result.is_success() {
				writeln!(out, "Thank you for ordering from {}!", store.config().store.name)?;
			}
		},
		Command::Session(SessionCommand::End) => {
			orders.end_session().await?;
			writeln!(out, "Session ended.")?;
		},
		Command::Subscribe { email } => match forms::validate_subscribe(&email) {
			Ok(_) => writeln!(out, "{}", SUBSCRIBE_SUCCESS)?,
			Err(e) => writeln!(out, "{}", e)?,
		},
		Command::Feedback {
			name,
			email,
			message,
		} => {
			let reply = match forms::validate_feedback(&name, &email, &message) {
				Ok(_) => FEEDBACK_SUCCESS.to_string(),
				Err(e) => e.to_string(),
			};
			writeln!(out, "{}", reply)?;
		},
	}

	Ok(())
}

async fn render_cart<W: Write>(store: &Storefront, out: &mut W) -> Result<(), CommandError> {
	let summary = store.cart_summary().await;

	if summary.is_empty() {
		writeln!(out, "Your cart is empty.")?;
	}
	for line in &summary.lines {
		writeln!(
			out,
			"{:<28} Qty: {} x {:>8} {:>9}",
			line.product.name,
			line.quantity,
			format_usd(line.product.price),
			format_usd(line.line_total)
		)?;
	}
	writeln!(out, "{:<52} {:>9}", "Total", summary.formatted_total())?;
	if !summary.unknown.is_empty() {
		writeln!(
			out,
			"No longer available (not counted): {}",
			summary.unknown.join(", ")
		)?;
	}

	if store.orders().is_order_processed().await {
		writeln!(out, "Your order for this session has been processed.")?;
	}
	Ok(())
}

async fn render_custom_order<W: Write>(store: &Storefront, out: &mut W) -> Result<(), CommandError> {
	match store.orders().get_custom_order().await {
		Some(order) => {
			for field in CustomOrderField::all() {
				writeln!(out, "{}: {}", field.label(), order.get(field))?;
			}
		},
		None => writeln!(out, "No custom order saved this session.")?,
	}
	Ok(())
}
