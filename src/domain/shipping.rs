use super::money::{CurrencyAmount, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A shipping quote from the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingOption {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub cost: Decimal,
    #[serde(default)]
    pub is_recommended: bool,
}

/// A shipping option in the shape the PayPal widget renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratedShippingOption {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub selected: bool,
    pub amount: CurrencyAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingResolution {
    pub chosen_option_id: Option<String>,
    pub shipping_amount: Money,
    pub decorated_options: Vec<DecoratedShippingOption>,
}

/// What a shipping-change event should do with the quoted options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShippingDecision {
    /// The cart has no physical items: patch the total only.
    NotRequired,
    /// The cart needs shipping but nothing can be shipped to this address.
    Unserviceable,
    Resolved(ShippingResolution),
}

/// Picks the branch for a shipping-change event.
///
/// `shopper_selection` is the option id the shopper last locked in, and
/// `addresses_match` tells whether that lock was made against the address
/// being quoted now.
pub fn decide(
    requires_shipping: bool,
    options: &[ShippingOption],
    shopper_selection: Option<&str>,
    addresses_match: bool,
    currency_code: &str,
) -> ShippingDecision {
    if !requires_shipping {
        return ShippingDecision::NotRequired;
    }
    if options.is_empty() {
        return ShippingDecision::Unserviceable;
    }
    ShippingDecision::Resolved(resolve(
        options,
        shopper_selection,
        addresses_match,
        currency_code,
    ))
}

/// Marks the authoritative option and decorates the list for the widget.
///
/// A selection only stays locked in while the address is unchanged and the
/// option is still quoted. Otherwise the first recommended option wins.
pub fn resolve(
    options: &[ShippingOption],
    shopper_selection: Option<&str>,
    addresses_match: bool,
    currency_code: &str,
) -> ShippingResolution {
    let locked = shopper_selection
        .filter(|_| addresses_match)
        .filter(|id| options.iter().any(|option| option.id == *id));

    let chosen = match locked {
        Some(id) => options.iter().find(|option| option.id == id),
        None => options.iter().find(|option| option.is_recommended),
    };
    let chosen_option_id = chosen.map(|option| option.id.clone());

    let mut decorated_options: Vec<DecoratedShippingOption> = options
        .iter()
        .map(|option| DecoratedShippingOption {
            id: option.id.clone(),
            kind: "SHIPPING".to_string(),
            label: option.description.clone(),
            selected: chosen_option_id.as_deref() == Some(option.id.as_str()),
            amount: CurrencyAmount::new(currency_code, Money::new(option.cost)),
        })
        .collect();
    // Stable: keeps input order among unselected options.
    decorated_options.sort_by_key(|option| !option.selected);

    let shipping_amount = chosen
        .map(|option| Money::new(option.cost))
        .unwrap_or(Money::ZERO);

    ShippingResolution {
        chosen_option_id,
        shipping_amount,
        decorated_options,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn option(id: &str, cost: Decimal, is_recommended: bool) -> ShippingOption {
        ShippingOption {
            id: id.to_string(),
            description: format!("Option {id}"),
            cost,
            is_recommended,
        }
    }

    fn selected_ids(resolution: &ShippingResolution) -> Vec<&str> {
        resolution
            .decorated_options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.id.as_str())
            .collect()
    }

    #[test]
    fn test_recommended_wins_without_selection() {
        let options = vec![option("A", dec!(5.00), true), option("B", dec!(12.00), false)];
        let resolution = resolve(&options, None, false, "USD");

        assert_eq!(resolution.chosen_option_id.as_deref(), Some("A"));
        assert_eq!(resolution.shipping_amount.to_currency_string(), "5.00");
        assert_eq!(selected_ids(&resolution), vec!["A"]);
    }

    #[test]
    fn test_locked_selection_on_same_address() {
        let options = vec![option("A", dec!(5.00), true), option("B", dec!(12.00), false)];
        let resolution = resolve(&options, Some("B"), true, "USD");

        assert_eq!(resolution.chosen_option_id.as_deref(), Some("B"));
        assert_eq!(resolution.shipping_amount.to_currency_string(), "12.00");
        assert_eq!(resolution.decorated_options[0].id, "B");
        assert_eq!(selected_ids(&resolution), vec!["B"]);
    }

    #[test]
    fn test_selection_ignored_after_address_change() {
        let options = vec![option("A", dec!(5.00), true), option("B", dec!(12.00), false)];
        let resolution = resolve(&options, Some("B"), false, "USD");

        assert_eq!(resolution.chosen_option_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_stale_selection_falls_back_to_recommended() {
        let options = vec![option("A", dec!(5.00), true), option("B", dec!(12.00), false)];
        let resolution = resolve(&options, Some("gone"), true, "USD");

        assert_eq!(resolution.chosen_option_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_first_recommended_wins() {
        let options = vec![
            option("A", dec!(3.00), false),
            option("B", dec!(4.00), true),
            option("C", dec!(6.00), true),
        ];
        let resolution = resolve(&options, None, false, "USD");

        assert_eq!(resolution.chosen_option_id.as_deref(), Some("B"));
        assert_eq!(selected_ids(&resolution), vec!["B"]);
        let order: Vec<_> = resolution
            .decorated_options
            .iter()
            .map(|option| option.id.as_str())
            .collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_nothing_selected_means_zero_shipping() {
        let options = vec![option("A", dec!(3.00), false), option("B", dec!(4.00), false)];
        let resolution = resolve(&options, None, false, "USD");

        assert!(resolution.chosen_option_id.is_none());
        assert_eq!(resolution.shipping_amount, Money::ZERO);
        assert!(selected_ids(&resolution).is_empty());
    }

    #[test]
    fn test_decorated_shape() {
        let options = vec![option("A", dec!(5), true)];
        let resolution = resolve(&options, None, false, "EUR");
        let json = serde_json::to_value(&resolution.decorated_options[0]).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "A",
                "type": "SHIPPING",
                "label": "Option A",
                "selected": true,
                "amount": { "currency_code": "EUR", "value": "5.00" }
            })
        );
    }

    #[test]
    fn test_decide_branches() {
        let options = vec![option("A", dec!(5.00), true)];

        assert_eq!(
            decide(false, &options, None, false, "USD"),
            ShippingDecision::NotRequired
        );
        assert_eq!(
            decide(true, &[], None, false, "USD"),
            ShippingDecision::Unserviceable
        );
        assert!(matches!(
            decide(true, &options, None, false, "USD"),
            ShippingDecision::Resolved(_)
        ));
    }
}
