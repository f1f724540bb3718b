//! HTML rendering for the storefront page.

use std::fmt::Write as _;

use storefront_core::Product;

const INDEX_TEMPLATE: &str = include_str!("../templates/index.html");

/// Renders the storefront page listing `products`.
pub fn render_index(products: &[Product]) -> String {
    let mut cards = String::new();
    if products.is_empty() {
        cards.push_str("    <p class=\"empty\">No products available.</p>\n");
    }
    for product in products {
        render_card(&mut cards, product);
    }

    INDEX_TEMPLATE
        .replace("{{count}}", &products.len().to_string())
        .replace("{{products}}", cards.trim_end())
}

fn render_card(out: &mut String, product: &Product) {
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        concat!(
            "    <article class=\"product\" id=\"product-{id}\">\n",
            "      <a href=\"{url}\"><img src=\"{image}\" alt=\"{name}\"></a>\n",
            "      <h2><a href=\"{url}\">{name}</a></h2>\n",
            "      <p class=\"price\">{price}</p>\n",
            "      <p class=\"meta\">{brand} &middot; {model} &middot; {category}</p>\n",
            "      <p>{description}</p>\n",
            "    </article>\n",
        ),
        id = escape_html(&product.product_id),
        url = escape_html(&product.url),
        image = escape_html(&product.image),
        name = escape_html(&product.name),
        price = format_price(product.price),
        brand = escape_html(&product.brand),
        model = escape_html(&product.model),
        category = escape_html(&product.category),
        description = escape_html(&product.description),
    );
}

/// Formats integer cents as dollars, e.g. `1999` as `$19.99`.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(name: &str, price: i64) -> Product {
        Product {
            product_id: "873244444".to_owned(),
            name: name.to_owned(),
            product_type: "HardGood".to_owned(),
            price,
            upc: String::new(),
            description: "desc".to_owned(),
            brand: "Acme".to_owned(),
            model: "W-1".to_owned(),
            url: "https://shop.example.com/1".to_owned(),
            image: "https://img.example.com/1.jpg".to_owned(),
            category: "Gadgets".to_owned(),
        }
    }

    #[test]
    fn escape_html_replaces_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn format_price_pads_cents() {
        assert_eq!(format_price(1999), "$19.99");
        assert_eq!(format_price(49), "$0.49");
        assert_eq!(format_price(500), "$5.00");
        assert_eq!(format_price(0), "$0.00");
        assert_eq!(format_price(-250), "-$2.50");
    }

    #[test]
    fn index_lists_each_product() {
        let html = render_index(&[product("Widget", 1999), product("Gizmo", 500)]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("2 products picked at random"));
        assert!(html.contains("<h2><a href=\"https://shop.example.com/1\">Widget</a></h2>"));
        assert!(html.contains("$19.99"));
        assert!(html.contains("Gizmo"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn index_escapes_product_fields() {
        let html = render_index(&[product("<script>alert(1)</script>", 100)]);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn empty_index_says_so() {
        let html = render_index(&[]);
        assert!(html.contains("No products available."));
        assert!(html.contains("0 products picked at random"));
    }
}
