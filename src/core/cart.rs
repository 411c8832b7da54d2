//! Shopping cart store.
//!
//! A [`Cart`] is a plain snapshot of line items; [`load_cart`] and
//! [`save_cart`] convert it to and from the single JSON blob kept under
//! [`CART_STORAGE_KEY`]. [`CartStore`] owns a cart plus a storage backend,
//! loads once when created and writes the whole cart back after every mutation.

use crate::{
    core::{mesh::Dimensions, pricing::PrintConfig},
    errors::Result,
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

/// Key the cart blob is stored under
pub const CART_STORAGE_KEY: &str = "boxpox-cart";

/// A not-yet-submitted print order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintCartItem {
    pub id: String,
    pub added_at: DateTime<Utc>,
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    /// Base64 encoded model, uploaded at checkout
    pub file_data: String,
    pub material: String,
    pub color: String,
    pub quality: String,
    pub infill: f64,
    pub scale: f64,
    pub quantity: i32,
    pub dimensions: Dimensions,
    pub volume: f64,
    pub unit_price: f64,
    pub total_price: f64,
}

impl PrintCartItem {
    /// Decodes the stored model bytes.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Validation`] when the payload is not valid base64.
    pub fn file_bytes(&self) -> Result<Vec<u8>> {
        STANDARD
            .decode(&self.file_data)
            .map_err(|e| crate::errors::Error::validation(format!("Corrupt cart file payload: {e}")))
    }

    /// The print settings captured on this line
    #[must_use]
    pub fn config(&self) -> PrintConfig {
        PrintConfig {
            material: self.material.clone(),
            quality: self.quality.clone(),
            infill: self.infill,
            scale: self.scale,
            quantity: self.quantity,
        }
    }
}

/// Input for [`Cart::add_print_item`]
#[derive(Debug, Clone, PartialEq)]
pub struct NewPrintItem {
    pub file_name: String,
    pub file_type: String,
    pub file_bytes: Vec<u8>,
    pub config: PrintConfig,
    pub color: String,
    pub dimensions: Dimensions,
    pub volume: f64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// A catalog product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCartItem {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub image: Option<String>,
}

/// One line of the cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartItem {
    Print(PrintCartItem),
    Product(ProductCartItem),
}

impl CartItem {
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Print(item) => &item.id,
            Self::Product(item) => &item.id,
        }
    }

    #[must_use]
    pub const fn quantity(&self) -> i32 {
        match self {
            Self::Print(item) => item.quantity,
            Self::Product(item) => item.quantity,
        }
    }

    /// Price of the whole line
    #[must_use]
    pub fn line_total(&self) -> f64 {
        match self {
            Self::Print(item) => item.total_price,
            Self::Product(item) => item.price * f64::from(item.quantity),
        }
    }
}

/// Snapshot of the cart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Adds a print line with a fresh id and timestamp, returning the id.
    pub fn add_print_item(&mut self, item: NewPrintItem) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.items.push(CartItem::Print(PrintCartItem {
            id: id.clone(),
            added_at: Utc::now(),
            file_name: item.file_name,
            file_type: item.file_type,
            file_size: item.file_bytes.len() as u64,
            file_data: STANDARD.encode(&item.file_bytes),
            material: item.config.material,
            color: item.color,
            quality: item.config.quality,
            infill: item.config.infill,
            scale: item.config.scale,
            quantity: item.config.quantity,
            dimensions: item.dimensions,
            volume: item.volume,
            unit_price: item.unit_price,
            total_price: item.total_price,
        }));
        id
    }

    /// Adds a product, merging into an existing line for the same product.
    ///
    /// Returns the id of the line that now holds the product.
    pub fn add_product_item(
        &mut self,
        product_id: &str,
        name: &str,
        price: f64,
        quantity: i32,
        image: Option<String>,
    ) -> String {
        let existing = self.items.iter_mut().find_map(|item| match item {
            CartItem::Product(p) if p.product_id == product_id => Some(p),
            _ => None,
        });

        if let Some(line) = existing {
            line.quantity += quantity;
            return line.id.clone();
        }

        let id = uuid::Uuid::new_v4().to_string();
        self.items.push(CartItem::Product(ProductCartItem {
            id: id.clone(),
            product_id: product_id.to_string(),
            name: name.to_string(),
            price,
            quantity,
            image,
        }));
        id
    }

    /// Removes a line; returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        self.items.len() != before
    }

    /// Sets a line's quantity, removing the line when `quantity <= 0`.
    ///
    /// Print lines keep their unit price and have their total recomputed.
    /// Returns whether the line existed.
    pub fn update_quantity(&mut self, id: &str, quantity: i32) -> bool {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        let Some(item) = self.items.iter_mut().find(|item| item.id() == id) else {
            return false;
        };
        match item {
            CartItem::Print(p) => {
                p.quantity = quantity;
                p.total_price = p.unit_price * f64::from(quantity);
            }
            CartItem::Product(p) => p.quantity = quantity,
        }
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of print totals plus product price × quantity
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines
    #[must_use]
    pub fn item_count(&self) -> i32 {
        self.items.iter().map(CartItem::quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parses a stored cart blob. Corrupt or missing data yields an empty cart.
#[must_use]
pub fn load_cart(raw: Option<&str>) -> Cart {
    let Some(raw) = raw else {
        return Cart::default();
    };
    match serde_json::from_str::<Vec<CartItem>>(raw) {
        Ok(items) => Cart { items },
        Err(e) => {
            warn!("Discarding unreadable cart data: {e}");
            Cart::default()
        }
    }
}

/// Serializes a cart to its stored form.
///
/// # Errors
/// Returns [`crate::errors::Error::Json`] if serialization fails.
pub fn save_cart(cart: &Cart) -> Result<String> {
    serde_json::to_string(&cart.items).map_err(Into::into)
}

/// Key-value backend the cart is persisted to
pub trait CartStorage {
    /// # Errors
    /// Returns an error when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// # Errors
    /// Returns an error when the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-process storage, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl CartStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One JSON file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CartStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

/// A cart bound to its storage backend
#[derive(Debug)]
pub struct CartStore<S: CartStorage> {
    storage: S,
    cart: Cart,
}

impl<S: CartStorage> CartStore<S> {
    /// Loads the cart from `storage`.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    pub fn open(storage: S) -> Result<Self> {
        let raw = storage.get(CART_STORAGE_KEY)?;
        let cart = load_cart(raw.as_deref());
        Ok(Self { storage, cart })
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    fn persist(&mut self) -> Result<()> {
        let raw = save_cart(&self.cart)?;
        self.storage.set(CART_STORAGE_KEY, &raw)
    }

    /// # Errors
    /// Returns an error when the cart cannot be persisted.
    pub fn add_print_item(&mut self, item: NewPrintItem) -> Result<String> {
        let id = self.cart.add_print_item(item);
        self.persist()?;
        Ok(id)
    }

    /// # Errors
    /// Returns an error when the cart cannot be persisted.
    pub fn add_product_item(
        &mut self,
        product_id: &str,
        name: &str,
        price: f64,
        quantity: i32,
        image: Option<String>,
    ) -> Result<String> {
        let id = self
            .cart
            .add_product_item(product_id, name, price, quantity, image);
        self.persist()?;
        Ok(id)
    }

    /// # Errors
    /// Returns an error when the cart cannot be persisted.
    pub fn remove_item(&mut self, id: &str) -> Result<bool> {
        let removed = self.cart.remove_item(id);
        self.persist()?;
        Ok(removed)
    }

    /// # Errors
    /// Returns an error when the cart cannot be persisted.
    pub fn update_quantity(&mut self, id: &str, quantity: i32) -> Result<bool> {
        let found = self.cart.update_quantity(id, quantity);
        self.persist()?;
        Ok(found)
    }

    /// Empties the cart, e.g. after checkout.
    ///
    /// # Errors
    /// Returns an error when the cart cannot be persisted.
    pub fn clear(&mut self) -> Result<()> {
        self.cart.clear();
        self.persist()
    }

    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.cart.total_price()
    }

    #[must_use]
    pub fn item_count(&self) -> i32 {
        self.cart.item_count()
    }

    /// Hands back the storage backend
    pub fn into_storage(self) -> S {
        self.storage
    }
}
