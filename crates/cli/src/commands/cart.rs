//! Cart commands.
//!
//! Every editing command mounts a provider over the configured `FileStore`,
//! performs one operation inside the provider scope, waits for the write and
//! unmounts. The process exits right after, so nothing is left in flight.
//!
//! # Usage
//!
//! ```bash
//! gm-cart add sku-1 -t "Mug" -i https://img/mug.png -p 12.00
//! gm-cart show
//! ```

use std::fmt::Write as _;
use std::sync::Arc;

use go_marketplace_cart::{
    CartConfig, CartProvider, CartStore, FileStore, KeyValueStore, Result, use_cart,
};
use go_marketplace_core::{CartList, Product, ProductId};

/// Print the persisted cart.
pub async fn show(config: &CartConfig) -> Result<()> {
    let provider = mount(config).await?;
    let products = provider.scope(async { use_cart().map(|cart| cart.products()) }).await?;
    print_cart(&products);
    provider.unmount().await
}

/// Add one unit of `product`.
pub async fn add(config: &CartConfig, product: Product) -> Result<()> {
    tracing::info!("Adding {} to cart", product.id);
    edit(config, |cart| cart.add_to_cart(product)).await
}

/// Increase the quantity of `id` by one.
pub async fn increment(config: &CartConfig, id: ProductId) -> Result<()> {
    edit(config, |cart| {
        warn_if_missing(cart, &id);
        cart.increment(&id)
    })
    .await
}

/// Decrease the quantity of `id` by one.
pub async fn decrement(config: &CartConfig, id: ProductId) -> Result<()> {
    edit(config, |cart| {
        warn_if_missing(cart, &id);
        cart.decrement(&id)
    })
    .await
}

/// Delete the persisted cart.
pub async fn clear(config: &CartConfig) -> Result<()> {
    let storage = FileStore::new(&config.storage_dir);
    storage.remove_item(&config.storage_key).await?;
    tracing::info!("Cart cleared ({})", storage.path_for(&config.storage_key).display());
    Ok(())
}

async fn mount(config: &CartConfig) -> Result<CartProvider<FileStore>> {
    let storage = Arc::new(FileStore::new(&config.storage_dir));
    CartProvider::mount(storage, config).await
}

async fn edit(
    config: &CartConfig,
    op: impl FnOnce(&CartStore) -> go_marketplace_cart::PersistTicket,
) -> Result<()> {
    let provider = mount(config).await?;
    let products = provider
        .scope(async {
            let cart = use_cart()?;
            op(&cart).wait().await?;
            Ok::<_, go_marketplace_cart::CartError>(cart.products())
        })
        .await?;
    print_cart(&products);
    provider.unmount().await
}

/// Returns `true` if `id` has a line in the mounted cart.
fn warn_if_missing(cart: &CartStore, id: &ProductId) -> bool {
    let present = cart.products().get(id).is_some();
    if !present {
        tracing::warn!("{id} is not in the cart, nothing to change");
    }
    present
}

#[allow(clippy::print_stdout)]
fn print_cart(products: &CartList) {
    print!("{}", render(products));
}

/// Format the cart as a plain-text table.
fn render(products: &CartList) -> String {
    if products.is_empty() {
        return "Cart is empty\n".to_string();
    }

    let mut out = String::new();
    for item in products {
        let _ = writeln!(
            out,
            "{:>4} x {:<24} {:<12} {:>10} {:>10}",
            item.quantity,
            item.title,
            item.id,
            item.price.to_string(),
            item.line_total().to_string()
        );
    }
    let _ = writeln!(
        out,
        "Items: {}  Subtotal: {}",
        products.total_quantity(),
        products.subtotal()
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::{LineItem, Price};

    use super::*;

    fn config_in(dir: &std::path::Path) -> CartConfig {
        CartConfig {
            storage_dir: dir.to_path_buf(),
            ..CartConfig::default()
        }
    }

    async fn stored(config: &CartConfig) -> Option<CartList> {
        FileStore::new(&config.storage_dir)
            .get_item(&config.storage_key)
            .await
            .unwrap()
            .map(|raw| CartList::from_json(&raw).unwrap())
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&CartList::new()), "Cart is empty\n");
    }

    #[test]
    fn test_render_totals() {
        let products = CartList::from_iter([LineItem::from_product(
            Product::new("mug", "Mug", "mug.png", Price::from_cents(1200)),
            2,
        )]);

        let out = render(&products);
        assert!(out.contains("Mug"));
        assert!(out.contains("24.00"));
        assert!(out.ends_with("Items: 2  Subtotal: 24.00\n"));
    }

    #[tokio::test]
    async fn test_missing_check_uses_mounted_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        add(&config, Product::new("mug", "Mug", "mug.png", Price::from_cents(1200)))
            .await
            .unwrap();

        let provider = mount(&config).await.unwrap();
        assert!(warn_if_missing(provider.store(), &ProductId::new("mug")));
        assert!(!warn_if_missing(provider.store(), &ProductId::new("tea")));
        provider.unmount().await.unwrap();
    }

    #[tokio::test]
    async fn test_increment_missing_id_leaves_cart_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        add(&config, Product::new("mug", "Mug", "mug.png", Price::from_cents(1200)))
            .await
            .unwrap();
        let before = stored(&config).await.unwrap();

        increment(&config, ProductId::new("tea")).await.unwrap();
        decrement(&config, ProductId::new("tea")).await.unwrap();

        assert_eq!(stored(&config).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_commands_edit_the_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mug = Product::new("mug", "Mug", "mug.png", Price::from_cents(1200));

        add(&config, mug.clone()).await.unwrap();
        add(&config, mug).await.unwrap();
        increment(&config, ProductId::new("mug")).await.unwrap();
        decrement(&config, ProductId::new("mug")).await.unwrap();

        let cart = stored(&config).await.unwrap();
        assert_eq!(cart.get(&ProductId::new("mug")).unwrap().quantity, 2);

        show(&config).await.unwrap();

        clear(&config).await.unwrap();
        assert!(stored(&config).await.is_none());
    }
}
