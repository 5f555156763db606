use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub(crate) const INDEX_STATEMENTS: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_sessions_profile_id ON sessions(profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_shops_owner_id ON shops(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_shops_status ON shops(status)",
    "CREATE INDEX IF NOT EXISTS idx_shop_services_shop_id ON shop_services(shop_id)",
    "CREATE INDEX IF NOT EXISTS idx_shop_staff_shop_id ON shop_staff(shop_id)",
    "CREATE INDEX IF NOT EXISTS idx_shop_staff_profile_id ON shop_staff(profile_id)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_shop_date ON bookings(shop_id, appointment_date)",
    "CREATE INDEX IF NOT EXISTS idx_bookings_customer_id ON bookings(customer_id)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create profiles table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            email VARCHAR(255) NOT NULL UNIQUE,
            password_hash VARCHAR(255) NOT NULL,
            full_name VARCHAR(255) NOT NULL,
            role VARCHAR(32) NOT NULL
                CHECK (role IN ('owner', 'provider', 'customer', 'super_admin')),
            business_name VARCHAR(255) NULL,
            subscription_status VARCHAR(32) NOT NULL DEFAULT 'none'
                CHECK (subscription_status IN ('none', 'trialing', 'active', 'past_due', 'canceled')),
            subscription_plan VARCHAR(64) NULL,
            trial_ends_at TIMESTAMP WITH TIME ZONE NULL,
            subscription_started_at TIMESTAMP WITH TIME ZONE NULL,
            current_period_end TIMESTAMP WITH TIME ZONE NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(128) PRIMARY KEY,
            profile_id UUID NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shops table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shops (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL REFERENCES profiles(id),
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            address TEXT NULL,
            phone VARCHAR(64) NULL,
            timezone VARCHAR(64) NOT NULL DEFAULT 'UTC',
            status VARCHAR(32) NOT NULL DEFAULT 'draft'
                CHECK (status IN ('draft', 'pending_review', 'approved', 'rejected', 'suspended')),
            rejection_reason TEXT NULL,
            operating_hours JSONB NOT NULL,
            manual_closed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shop_services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shop_services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            shop_id UUID NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
            name VARCHAR(255) NOT NULL,
            description TEXT NULL,
            price_cents BIGINT NOT NULL CHECK (price_cents >= 0),
            duration_minutes INTEGER NOT NULL CHECK (duration_minutes > 0),
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create shop_staff table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shop_staff (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            shop_id UUID NOT NULL REFERENCES shops(id) ON DELETE CASCADE,
            profile_id UUID NULL REFERENCES profiles(id),
            display_name VARCHAR(255) NOT NULL,
            active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create service_providers join table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_providers (
            service_id UUID NOT NULL REFERENCES shop_services(id) ON DELETE CASCADE,
            staff_id UUID NOT NULL REFERENCES shop_staff(id) ON DELETE CASCADE,
            PRIMARY KEY (service_id, staff_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create bookings table. No uniqueness on (provider, date, time): a slot
    // may be booked more than once.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            shop_id UUID NOT NULL REFERENCES shops(id),
            customer_id UUID NOT NULL REFERENCES profiles(id),
            provider_id UUID NULL REFERENCES shop_staff(id) ON DELETE SET NULL,
            services JSONB NOT NULL,
            appointment_date DATE NOT NULL,
            appointment_time TIME NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'pending'
                CHECK (status IN ('pending', 'approved', 'rejected', 'completed', 'cancelled')),
            total_cents BIGINT NOT NULL DEFAULT 0,
            notes TEXT NULL,
            status_reason TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes, one statement per query
    for statement in INDEX_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
