//! Plain-text tables for terminal output.

use foodscout_browse::{ProductDetail, ProductList};
use foodscout_cart::GroupedCartItem;
use foodscout_core::{AppConfig, Product};
use foodscout_off::CategoryTag;

const NAME_WIDTH: usize = 40;

/// Truncate to `max` characters, marking the cut with `...`.
pub(crate) fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

pub(crate) fn print_list(list: &ProductList) {
    if let Some(error) = list.error() {
        println!("{error}");
        return;
    }
    if list.show_no_results() {
        println!("No products match your search");
        return;
    }
    if list.displayed().is_empty() {
        println!("No products found");
        return;
    }

    print_products(list.displayed());

    let filter = list.filter();
    println!();
    println!(
        "showing {} of {} fetched, page {}{}{}",
        list.displayed().len(),
        list.all_fetched().len(),
        list.page(),
        if list.has_more() { ", more available" } else { "" },
        match filter.active_count() {
            0 => String::new(),
            n => format!(", {n} filter(s) active"),
        }
    );
}

pub(crate) fn print_products(products: &[Product]) {
    println!(
        "{:<16}{:<7}{:<w$}CATEGORY",
        "BARCODE",
        "GRADE",
        "NAME",
        w = NAME_WIDTH + 5
    );
    for product in products {
        println!(
            "{:<16}{:<7}{:<w$}{}",
            product.code.as_deref().unwrap_or("\u{2014}"),
            product.grade_label(),
            clip(product.display_name(), NAME_WIDTH),
            product.primary_category(),
            w = NAME_WIDTH + 5
        );
    }
}

pub(crate) fn print_detail(detail: &ProductDetail) {
    println!("{}", detail.name);
    println!("{}", detail.description);
    println!();
    if let Some(barcode) = &detail.barcode {
        println!("Barcode:   {barcode}");
    }
    if let Some(brands) = &detail.brands {
        println!("Brands:    {brands}");
    }
    if let Some(quantity) = &detail.quantity {
        println!("Quantity:  {quantity}");
    }
    println!("Category:  {}", detail.category);
    println!("Grade:     {}", detail.grade);
    if let Some(image) = &detail.image_url {
        println!("Image:     {image}");
    }
    if !detail.labels.is_empty() {
        println!("Labels:    {}", detail.labels.join(", "));
    }

    if let Some(rows) = &detail.nutrition {
        println!();
        println!("Nutrition facts (per 100 g)");
        for row in rows {
            let value = row
                .value
                .map_or_else(|| "\u{2014}".to_string(), |v| format!("{v} {}", row.unit));
            println!("  {:<16}{value}", row.label);
        }
    }

    if let Some(ingredients) = &detail.ingredients {
        println!();
        println!("Ingredients");
        println!("  {ingredients}");
    }
}

pub(crate) fn print_cart(groups: &[GroupedCartItem]) {
    if groups.is_empty() {
        println!("Your cart is empty");
        return;
    }
    println!("{:<24}{:>5}  NAME", "KEY", "QTY");
    for group in groups {
        println!(
            "{:<24}{:>5}  {}",
            group.key,
            group.quantity,
            clip(group.product.display_name(), NAME_WIDTH)
        );
    }
    let total: usize = groups.iter().map(|g| g.quantity).sum();
    println!();
    println!("{} line(s), {total} item(s)", groups.len());
}

pub(crate) fn print_categories(tags: &[CategoryTag]) {
    if tags.is_empty() {
        println!("No categories found");
        return;
    }
    println!("{:>10}  {:<w$}ID", "PRODUCTS", "NAME", w = NAME_WIDTH + 5);
    for tag in tags {
        println!(
            "{:>10}  {:<w$}{}",
            tag.products,
            clip(&tag.name, NAME_WIDTH),
            tag.id,
            w = NAME_WIDTH + 5
        );
    }
}

pub(crate) fn print_config(config: &AppConfig) {
    println!("env:                 {}", config.env);
    println!("log_level:           {}", config.log_level);
    println!("api_base_url:        {}", config.api_base_url);
    println!("page_size:           {}", config.page_size);
    println!("request_timeout:     {}s", config.request_timeout_secs);
    println!("user_agent:          {}", config.user_agent);
    println!("max_retries:         {}", config.max_retries);
    println!("retry_backoff_base:  {}ms", config.retry_backoff_base_ms);
    println!("cart_path:           {}", config.cart_path.display());
}
