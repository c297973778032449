//! Demo data generation.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use rand::seq::IndexedRandom;
use rand::Rng;

use coupons_core::{
    CouponCode, CouponCustomerLink, CouponId, CustomerId, DiscountType, NewCoupon, NewCustomer,
    Username, COUPON_CODE_LEN,
};

const CUSTOMERS: usize = 10;
const COUPONS: usize = 20;
const LINKS_PER_CUSTOMER: usize = 3;

/// Rows to insert, before the store assigns ids.
pub struct Fixture {
    pub customers: Vec<NewCustomer>,
    pub coupons: Vec<NewCoupon>,
}

/// Build the demo customers and coupons around `now`.
///
/// Coupon `i` is active when `i` is odd and grants a fixed discount when
/// `i % 3 == 1`.
pub fn generate<R: Rng>(rng: &mut R, now: DateTime<Utc>) -> Fixture {
    let customers = (0..CUSTOMERS)
        .filter_map(|i| {
            Username::parse(format!("customer{i}"))
                .ok()
                .map(|username| NewCustomer {
                    username,
                    name: format!("Customer {i}"),
                })
        })
        .collect();

    let mut seen = HashSet::new();
    let mut coupons = Vec::with_capacity(COUPONS);
    while coupons.len() < COUPONS {
        let Some(code) = random_code(rng) else {
            continue;
        };
        if !seen.insert(code.clone()) {
            continue;
        }

        let i = coupons.len();
        coupons.push(NewCoupon {
            code,
            description: "The greatest discount".into(),
            discount: 42,
            discount_type: if i % 3 == 1 {
                DiscountType::Fixed
            } else {
                DiscountType::Percentage
            },
            is_active: i % 2 == 1,
            valid_from: now + Duration::days(rng.random_range(-7..7)),
            valid_until: now + Duration::days(rng.random_range(14..28)),
        });
    }

    Fixture { customers, coupons }
}

/// Link every customer to distinct random coupons.
pub fn pick_links<R: Rng>(
    rng: &mut R,
    coupons: &[CouponId],
    customers: &[CustomerId],
) -> Vec<CouponCustomerLink> {
    customers
        .iter()
        .flat_map(|&customer| {
            coupons
                .choose_multiple(rng, LINKS_PER_CUSTOMER)
                .map(move |&coupon| CouponCustomerLink::new(coupon, customer))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn random_code<R: Rng>(rng: &mut R) -> Option<CouponCode> {
    let code: String = (0..COUPON_CODE_LEN)
        .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
        .collect();
    CouponCode::parse(code).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generates_the_documented_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc::now();
        let data = generate(&mut rng, now);

        assert_eq!(data.customers.len(), 10);
        assert_eq!(data.customers[3].username.as_str(), "customer3");
        assert_eq!(data.customers[3].name, "Customer 3");

        assert_eq!(data.coupons.len(), 20);
        for (i, coupon) in data.coupons.iter().enumerate() {
            assert_eq!(coupon.discount, 42);
            assert_eq!(coupon.is_active, i % 2 == 1);
            assert_eq!(coupon.discount_type == DiscountType::Fixed, i % 3 == 1);
            assert!(coupon.code.as_str().bytes().all(|b| b.is_ascii_uppercase()));
            assert!(coupon.valid_from >= now - Duration::days(7));
            assert!(coupon.valid_from < now + Duration::days(7));
            assert!(coupon.valid_until >= now + Duration::days(14));
            assert!(coupon.valid_until < now + Duration::days(28));
        }

        let codes: HashSet<_> = data.coupons.iter().map(|c| c.code.clone()).collect();
        assert_eq!(codes.len(), 20);
    }

    #[test]
    fn links_are_distinct_per_customer() {
        let mut rng = StdRng::seed_from_u64(11);
        let coupons: Vec<_> = (1..=20).map(CouponId::new).collect();
        let customers: Vec<_> = (1..=10).map(CustomerId::new).collect();

        let links = pick_links(&mut rng, &coupons, &customers);

        assert_eq!(links.len(), 30);
        let unique: HashSet<_> = links.iter().copied().collect();
        assert_eq!(unique.len(), 30);
        for customer in &customers {
            assert_eq!(links.iter().filter(|l| l.customer_id == *customer).count(), 3);
        }
    }
}
