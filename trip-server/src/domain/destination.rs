//! Destinations: places to visit within a day.

use uuid::Uuid;

use super::cost::CostItem;
use super::currency::Currency;
use super::error::ValidationError;
use super::point::GeoPoint;

/// A place to visit, with location and one or more costs.
///
/// Destinations are immutable values: every edit returns a new value with
/// the same `id`, which is what correlates a destination across a day's
/// `destinations` list and its optimized route.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    /// Stable identifier, assigned at creation.
    pub id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    /// At least one entry, always.
    pub costs: Vec<CostItem>,
}

impl Destination {
    /// Create a destination with a single zero-valued cost.
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        latitude: f64,
        longitude: f64,
        currency: Currency,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            address: address.into(),
            latitude,
            longitude,
            costs: vec![CostItem::zero(currency)],
        }
    }

    /// Build a destination from a geocoding result.
    ///
    /// `label` is the geocoder's display name; when the geocoder returned
    /// nothing useful the `fallback_name` (usually the user's query text)
    /// is used instead.
    pub fn from_geocoded(
        point: GeoPoint,
        label: Option<String>,
        fallback_name: &str,
        currency: Currency,
    ) -> Self {
        let name = label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        Self::new(name, "", point.lat, point.lon, currency)
    }

    /// The destination's coordinates.
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Returns a copy with a fresh zero-valued cost appended.
    pub fn add_cost_item(&self, currency: Currency) -> Destination {
        let mut next = self.clone();
        next.costs.push(CostItem::zero(currency));
        next
    }

    /// Returns a copy without the named cost item.
    ///
    /// Fails with `MinimumOneCostItem` when it is the last one; the
    /// destination is unchanged in that case. Removing an unknown id is a
    /// no-op.
    pub fn remove_cost_item(&self, cost_id: &str) -> Result<Destination, ValidationError> {
        if self.costs.len() == 1 && self.costs[0].id == cost_id {
            return Err(ValidationError::MinimumOneCostItem);
        }
        let mut next = self.clone();
        next.costs.retain(|c| c.id != cost_id);
        Ok(next)
    }

    /// Returns a copy with the named cost item re-entered.
    ///
    /// Re-seats both the display and the original amount, so a later
    /// currency toggle converts from this new entry. Unknown ids leave the
    /// destination unchanged.
    pub fn update_cost_item(
        &self,
        cost_id: &str,
        detail: impl Into<String>,
        amount: impl Into<String>,
        currency: Currency,
    ) -> Destination {
        let detail = detail.into();
        let amount = amount.into();
        let mut next = self.clone();
        for cost in &mut next.costs {
            if cost.id == cost_id {
                cost.detail = detail;
                cost.amount = amount.clone();
                cost.original_amount = amount;
                cost.original_currency = currency;
                break;
            }
        }
        next
    }

    /// Look up a cost item by id.
    pub fn cost_item(&self, cost_id: &str) -> Option<&CostItem> {
        self.costs.iter().find(|c| c.id == cost_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::parse("USD").unwrap()
    }

    fn dest() -> Destination {
        Destination::new("Ben Thanh Market", "Le Loi, District 1", 10.7725, 106.698, usd())
    }

    #[test]
    fn new_destination_has_one_zero_cost() {
        let d = dest();
        assert_eq!(d.costs.len(), 1);
        assert!(d.costs[0].parsed().is_zero());
    }

    #[test]
    fn from_geocoded_prefers_label() {
        let d = Destination::from_geocoded(
            GeoPoint::new(10.0, 106.0),
            Some("Cho Ben Thanh, Ho Chi Minh City".into()),
            "ben thanh",
            usd(),
        );
        assert_eq!(d.name, "Cho Ben Thanh, Ho Chi Minh City");
        assert_eq!(d.latitude, 10.0);
        assert_eq!(d.longitude, 106.0);
    }

    #[test]
    fn from_geocoded_falls_back_to_query() {
        let d = Destination::from_geocoded(GeoPoint::new(10.0, 106.0), None, "ben thanh", usd());
        assert_eq!(d.name, "ben thanh");

        let d = Destination::from_geocoded(
            GeoPoint::new(10.0, 106.0),
            Some("  ".into()),
            "ben thanh",
            usd(),
        );
        assert_eq!(d.name, "ben thanh");
    }

    #[test]
    fn add_cost_item_appends() {
        let d = dest();
        let d2 = d.add_cost_item(usd());
        assert_eq!(d.costs.len(), 1);
        assert_eq!(d2.costs.len(), 2);
        assert_eq!(d2.id, d.id);
    }

    #[test]
    fn remove_last_cost_item_is_rejected() {
        let d = dest();
        let cost_id = d.costs[0].id.clone();
        let err = d.remove_cost_item(&cost_id).unwrap_err();
        assert_eq!(err, ValidationError::MinimumOneCostItem);
        // Original untouched
        assert_eq!(d.costs.len(), 1);
    }

    #[test]
    fn remove_cost_item_when_several() {
        let d = dest().add_cost_item(usd());
        let first_id = d.costs[0].id.clone();
        let d2 = d.remove_cost_item(&first_id).unwrap();
        assert_eq!(d2.costs.len(), 1);
        assert!(d2.cost_item(&first_id).is_none());
    }

    #[test]
    fn remove_unknown_cost_item_is_noop() {
        let d = dest().add_cost_item(usd());
        let d2 = d.remove_cost_item("nope").unwrap();
        assert_eq!(d2.costs.len(), 2);
    }

    #[test]
    fn update_cost_item_reseats_original() {
        let vnd = Currency::parse("VND").unwrap();
        let d = dest();
        let cost_id = d.costs[0].id.clone();

        let d2 = d.update_cost_item(&cost_id, "entrance", "250000", vnd);
        let cost = d2.cost_item(&cost_id).unwrap();
        assert_eq!(cost.detail, "entrance");
        assert_eq!(cost.amount, "250000");
        assert_eq!(cost.original_amount, "250000");
        assert_eq!(cost.original_currency, vnd);
    }

    #[test]
    fn update_unknown_cost_item_is_noop() {
        let d = dest();
        let d2 = d.update_cost_item("nope", "x", "1", usd());
        assert_eq!(d, d2);
    }
}
