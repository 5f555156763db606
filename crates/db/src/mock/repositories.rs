use chrono::{NaiveDate, NaiveTime};
use mockall::mock;
use slotbook_core::models::{booking::BookingStatus, shop::ShopStatus};
use uuid::Uuid;

use crate::models::{DbBooking, DbProfile, DbSession, DbShop, DbShopService, DbShopStaff};

// Mock repositories for testing
mock! {
    pub ProfileRepo {
        pub async fn get_profile_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbProfile>>;

        pub async fn get_profile_by_email(
            &self,
            email: String,
        ) -> eyre::Result<Option<DbProfile>>;

        pub async fn get_active_session(
            &self,
            token: String,
        ) -> eyre::Result<Option<DbSession>>;
    }
}

mock! {
    pub ShopRepo {
        pub async fn get_shop_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbShop>>;

        pub async fn set_shop_status(
            &self,
            id: Uuid,
            status: ShopStatus,
            rejection_reason: Option<String>,
        ) -> eyre::Result<DbShop>;
    }
}

mock! {
    pub CatalogRepo {
        pub async fn get_services_by_shop(
            &self,
            shop_id: Uuid,
        ) -> eyre::Result<Vec<DbShopService>>;

        pub async fn get_staff_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbShopStaff>>;

        pub async fn get_staff_for_profile(
            &self,
            shop_id: Uuid,
            profile_id: Uuid,
        ) -> eyre::Result<Vec<DbShopStaff>>;
    }
}

mock! {
    pub BookingRepo {
        pub async fn get_booking_by_id(
            &self,
            id: Uuid,
        ) -> eyre::Result<Option<DbBooking>>;

        pub async fn update_booking_status(
            &self,
            id: Uuid,
            status: BookingStatus,
            reason: Option<String>,
        ) -> eyre::Result<DbBooking>;

        pub async fn reschedule_booking(
            &self,
            id: Uuid,
            appointment_date: NaiveDate,
            appointment_time: NaiveTime,
            status: BookingStatus,
        ) -> eyre::Result<DbBooking>;
    }
}
