//! Trips: the top-level itinerary value.

use chrono::NaiveDate;

use super::currency::Currency;
use super::day::Day;
use super::error::ValidationError;

/// A multi-day itinerary.
///
/// The trip is a persistent value: every operation returns a new `Trip`
/// built by copying the changed path, so callers can hold snapshots without
/// aliasing hazards, and a failed operation leaves the original untouched.
///
/// Day ids and numbers are strictly derived from list position; `renumber`
/// runs at the boundary of every day-list mutation, so the invariant
/// `days[i].day_number == i + 1 && days[i].id == (i + 1).to_string()` holds
/// after every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub name: String,
    /// Number of travellers, when known.
    pub members: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Display currency for all cost amounts.
    pub currency: Currency,
    /// At least one day, always.
    pub days: Vec<Day>,
}

impl Trip {
    /// Create a trip with a single empty day.
    pub fn new(name: impl Into<String>, currency: Currency) -> Self {
        Self {
            name: name.into(),
            members: None,
            start_date: None,
            end_date: None,
            currency,
            days: vec![Day::new(1)],
        }
    }

    /// Re-derive every day's id and number from its position.
    fn renumber(days: Vec<Day>) -> Vec<Day> {
        days.into_iter()
            .enumerate()
            .map(|(i, day)| day.renumbered(i as u32 + 1))
            .collect()
    }

    /// Returns a copy with an empty day appended.
    pub fn add_day(&self) -> Trip {
        let mut days = self.days.clone();
        days.push(Day::new(days.len() as u32 + 1));
        Trip {
            days: Self::renumber(days),
            ..self.clone()
        }
    }

    /// Returns a copy without the named day, renumbered `1..=N`.
    ///
    /// Fails with `MinimumOneDay` when only one day remains; the trip is
    /// unchanged in that case.
    pub fn remove_day(&self, day_id: &str) -> Result<Trip, ValidationError> {
        if self.days.len() == 1 {
            return Err(ValidationError::MinimumOneDay);
        }
        let mut days = self.days.clone();
        days.retain(|d| d.id != day_id);
        Ok(Trip {
            days: Self::renumber(days),
            ..self.clone()
        })
    }

    /// Returns a copy with a new empty day inserted immediately after the
    /// named one. An unknown anchor appends at the end.
    pub fn insert_day_after(&self, day_id: &str) -> Trip {
        let mut days = self.days.clone();
        let at = match days.iter().position(|d| d.id == day_id) {
            Some(i) => i + 1,
            None => days.len(),
        };
        days.insert(at, Day::new(0)); // renumber assigns the real number
        Trip {
            days: Self::renumber(days),
            ..self.clone()
        }
    }

    /// Returns a copy with the two named days' positions exchanged.
    ///
    /// A no-op (plain copy) if either id is absent or they are equal.
    pub fn swap_days(&self, day_id_a: &str, day_id_b: &str) -> Trip {
        let a = self.days.iter().position(|d| d.id == day_id_a);
        let b = self.days.iter().position(|d| d.id == day_id_b);
        match (a, b) {
            (Some(a), Some(b)) if a != b => {
                let mut days = self.days.clone();
                days.swap(a, b);
                Trip {
                    days: Self::renumber(days),
                    ..self.clone()
                }
            }
            _ => self.clone(),
        }
    }

    /// Look up a day by id.
    pub fn day(&self, day_id: &str) -> Option<&Day> {
        self.days.iter().find(|d| d.id == day_id)
    }

    /// Returns a copy with one day replaced by id.
    ///
    /// This is the write-back path for day-level edits (destinations,
    /// costs, routes): transform a snapshot of the day, then seat it here.
    pub fn with_day_replaced(&self, day: Day) -> Trip {
        let mut next = self.clone();
        for existing in &mut next.days {
            if existing.id == day.id {
                *existing = day;
                break;
            }
        }
        next
    }

    /// Returns a copy with a different display currency.
    pub fn with_currency(&self, currency: Currency) -> Trip {
        Trip {
            currency,
            ..self.clone()
        }
    }
}
