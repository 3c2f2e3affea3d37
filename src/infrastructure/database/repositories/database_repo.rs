//! SeaORM implementation of DatabaseRepo

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, warn};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::domain::{
    BookingError, DatabaseRepo, DomainError, DomainResult, Processed, Reservation, Room,
    RoomRestriction, StayPeriod, User,
};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::infrastructure::database::entities::{reservation, room, room_restriction, user};

pub struct SeaOrmDatabaseRepo {
    db: DatabaseConnection,
}

impl SeaOrmDatabaseRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn count_users(&self) -> DomainResult<u64> {
        Ok(user::Entity::find().count(&self.db).await?)
    }

    /// Create a back-office account. Used by the admin bootstrap; the guest
    /// workflow never creates users.
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        access_level: i32,
    ) -> DomainResult<i32> {
        let existing = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(DomainError::Conflict(format!("user {}", email)));
        }

        let now = Utc::now();
        let model = user::ActiveModel {
            id: NotSet,
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            email: Set(email.to_string()),
            password: Set(hash_password(password)?),
            access_level: Set(access_level),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = model.insert(&self.db).await?;
        debug!("Created user {} ({})", inserted.id, inserted.email);
        Ok(inserted.id)
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn room_to_domain(m: room::Model) -> Room {
    Room {
        id: m.id,
        room_name: m.room_name,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn reservation_to_domain(
    m: reservation::Model,
    room: Option<room::Model>,
) -> DomainResult<Reservation> {
    let processed = Processed::try_from(m.processed).map_err(|e| {
        error!("Reservation {} row is corrupt: {}", m.id, e);
        DomainError::Storage(format!("reservation {}: {}", m.id, e))
    })?;
    Ok(Reservation {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        phone: m.phone,
        start_date: m.start_date,
        end_date: m.end_date,
        room_id: m.room_id,
        room: room.map(room_to_domain).unwrap_or_default(),
        processed,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn user_to_domain(m: user::Model) -> User {
    User {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        email: m.email,
        password_hash: m.password,
        access_level: m.access_level,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

// Row writers shared by the plain and transactional paths.

async fn insert_reservation_row<C: ConnectionTrait>(
    conn: &C,
    r: &Reservation,
) -> Result<i32, DbErr> {
    let now = Utc::now();
    let model = reservation::ActiveModel {
        id: NotSet,
        first_name: Set(r.first_name.clone()),
        last_name: Set(r.last_name.clone()),
        email: Set(r.email.clone()),
        phone: Set(r.phone.clone()),
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        room_id: Set(r.room_id),
        processed: Set(r.processed.as_i32()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(model.insert(conn).await?.id)
}

async fn insert_restriction_row<C: ConnectionTrait>(
    conn: &C,
    r: &RoomRestriction,
) -> Result<(), DbErr> {
    let now = Utc::now();
    let model = room_restriction::ActiveModel {
        id: NotSet,
        start_date: Set(r.start_date),
        end_date: Set(r.end_date),
        room_id: Set(r.room_id),
        reservation_id: Set(r.reservation_id),
        restriction_id: Set(r.restriction.id()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    model.insert(conn).await?;
    Ok(())
}

/// Restrictions overlapping `[start, end)`.
fn overlapping(period: StayPeriod) -> sea_orm::Select<room_restriction::Entity> {
    room_restriction::Entity::find()
        .filter(room_restriction::Column::StartDate.lt(period.end()))
        .filter(room_restriction::Column::EndDate.gt(period.start()))
}

// ── DatabaseRepo impl ───────────────────────────────────────────

#[async_trait]
impl DatabaseRepo for SeaOrmDatabaseRepo {
    async fn ping(&self) -> DomainResult<()> {
        Ok(self.db.ping().await?)
    }

    async fn insert_reservation(&self, r: &Reservation) -> DomainResult<i32> {
        debug!("Inserting reservation for room {}", r.room_id);
        Ok(insert_reservation_row(&self.db, r).await?)
    }

    async fn insert_room_restriction(&self, r: &RoomRestriction) -> DomainResult<()> {
        debug!(
            "Inserting restriction on room {} for {}..{}",
            r.room_id, r.start_date, r.end_date
        );
        Ok(insert_restriction_row(&self.db, r).await?)
    }

    async fn insert_reservation_with_restriction(
        &self,
        r: &Reservation,
    ) -> Result<i32, BookingError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| BookingError::Reservation(e.into()))?;

        let id = insert_reservation_row(&txn, r)
            .await
            .map_err(|e| BookingError::Reservation(e.into()))?;

        let restriction = RoomRestriction::for_reservation(r, id);
        if let Err(e) = insert_restriction_row(&txn, &restriction).await {
            warn!("Rolling back reservation {}: {}", id, e);
            txn.rollback()
                .await
                .map_err(|rb| BookingError::Restriction {
                    orphaned: Some(id),
                    source: rb.into(),
                })?;
            return Err(BookingError::Restriction {
                orphaned: None,
                source: e.into(),
            });
        }

        txn.commit()
            .await
            .map_err(|e| BookingError::Reservation(e.into()))?;
        debug!("Reservation {} committed with its restriction", id);
        Ok(id)
    }

    async fn search_availability_by_dates_by_room_id(
        &self,
        period: StayPeriod,
        room_id: i32,
    ) -> DomainResult<bool> {
        let conflicts = overlapping(period)
            .filter(room_restriction::Column::RoomId.eq(room_id))
            .count(&self.db)
            .await?;
        Ok(conflicts == 0)
    }

    async fn search_availability_for_all_rooms(
        &self,
        period: StayPeriod,
    ) -> DomainResult<Vec<Room>> {
        let blocked: Vec<i32> = overlapping(period)
            .select_only()
            .column(room_restriction::Column::RoomId)
            .distinct()
            .into_tuple()
            .all(&self.db)
            .await?;

        let mut query = room::Entity::find().order_by_asc(room::Column::Id);
        if !blocked.is_empty() {
            query = query.filter(room::Column::Id.is_not_in(blocked));
        }
        let rooms = query.all(&self.db).await?;
        Ok(rooms.into_iter().map(room_to_domain).collect())
    }

    async fn get_room_by_id(&self, id: i32) -> DomainResult<Room> {
        room::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(room_to_domain)
            .ok_or_else(|| DomainError::not_found("Room", id))
    }

    async fn get_user_by_id(&self, id: i32) -> DomainResult<User> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(user_to_domain)
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    async fn update_user(&self, u: &User) -> DomainResult<()> {
        debug!("Updating user: {}", u.id);

        let Some(existing) = user::Entity::find_by_id(u.id).one(&self.db).await? else {
            return Err(DomainError::not_found("User", u.id));
        };

        let mut active: user::ActiveModel = existing.into();
        active.first_name = Set(u.first_name.clone());
        active.last_name = Set(u.last_name.clone());
        active.email = Set(u.email.clone());
        active.access_level = Set(u.access_level);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn authenticate(&self, email: &str, password: &str) -> DomainResult<(i32, String)> {
        let found = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;

        let Some(found) = found else {
            return Err(DomainError::Unauthorized("incorrect credentials".into()));
        };
        if !verify_password(password, &found.password)? {
            return Err(DomainError::Unauthorized("incorrect credentials".into()));
        }
        Ok((found.id, found.password))
    }

    async fn all_reservations(&self) -> DomainResult<Vec<Reservation>> {
        let rows = reservation::Entity::find()
            .find_also_related(room::Entity)
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await?;
        rows.into_iter()
            .map(|(r, room)| reservation_to_domain(r, room))
            .collect()
    }

    async fn all_new_reservations(&self) -> DomainResult<Vec<Reservation>> {
        let rows = reservation::Entity::find()
            .filter(reservation::Column::Processed.eq(Processed::New.as_i32()))
            .find_also_related(room::Entity)
            .order_by_asc(reservation::Column::StartDate)
            .all(&self.db)
            .await?;
        rows.into_iter()
            .map(|(r, room)| reservation_to_domain(r, room))
            .collect()
    }

    async fn get_reservation_by_id(&self, id: i32) -> DomainResult<Reservation> {
        reservation::Entity::find_by_id(id)
            .find_also_related(room::Entity)
            .one(&self.db)
            .await?
            .map(|(r, room)| reservation_to_domain(r, room))
            .ok_or_else(|| DomainError::not_found("Reservation", id))?
    }

    async fn update_reservation(&self, r: &Reservation) -> DomainResult<()> {
        debug!("Updating reservation: {}", r.id);

        let Some(existing) = reservation::Entity::find_by_id(r.id).one(&self.db).await? else {
            return Err(DomainError::not_found("Reservation", r.id));
        };

        let mut active: reservation::ActiveModel = existing.into();
        active.first_name = Set(r.first_name.clone());
        active.last_name = Set(r.last_name.clone());
        active.email = Set(r.email.clone());
        active.phone = Set(r.phone.clone());
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    async fn delete_reservation(&self, id: i32) -> DomainResult<()> {
        debug!("Deleting reservation: {}", id);

        let txn = self.db.begin().await?;
        room_restriction::Entity::delete_many()
            .filter(room_restriction::Column::ReservationId.eq(id))
            .exec(&txn)
            .await?;
        let result = reservation::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", id));
        }
        txn.commit().await?;
        Ok(())
    }

    async fn update_processed_for_reservation(
        &self,
        id: i32,
        processed: Processed,
    ) -> DomainResult<()> {
        let result = reservation::Entity::update_many()
            .col_expr(reservation::Column::Processed, Expr::value(processed.as_i32()))
            .col_expr(reservation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reservation::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Reservation", id));
        }
        Ok(())
    }
}
