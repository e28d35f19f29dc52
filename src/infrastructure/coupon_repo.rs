use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::coupon::{Coupon, NewCoupon};
use crate::domain::errors::DomainError;
use crate::domain::ports::CouponRepository;
use crate::schema::coupons;

use super::lower;
use super::models::{CouponRow, NewCouponRow};

impl From<CouponRow> for Coupon {
    fn from(row: CouponRow) -> Self {
        Coupon {
            id: row.id,
            code: row.code,
            discount_percentage: row.discount_percentage,
            active: row.active,
        }
    }
}

pub struct DieselCouponRepository {
    pool: DbPool,
}

impl DieselCouponRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl CouponRepository for DieselCouponRepository {
    fn find_active_by_code(&self, code: &str) -> Result<Option<Coupon>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = coupons::table
            .filter(lower(coupons::code).eq(lower(code)))
            .filter(coupons::active.eq(true))
            .select(CouponRow::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(row.map(Coupon::from))
    }

    fn create(&self, coupon: &NewCoupon) -> Result<Coupon, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let taken: bool = diesel::select(diesel::dsl::exists(
                coupons::table.filter(lower(coupons::code).eq(lower(coupon.code.as_str()))),
            ))
            .get_result(conn)?;
            if taken {
                return Err(DomainError::Conflict("Coupon code already exists".into()));
            }

            let row = diesel::insert_into(coupons::table)
                .values(&NewCouponRow {
                    code: coupon.code.clone(),
                    discount_percentage: coupon.discount_percentage.clone(),
                })
                .returning(CouponRow::as_returning())
                .get_result(conn)?;
            Ok(row.into())
        })
    }
}
