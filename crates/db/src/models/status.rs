//! Status helper enums mapping to SMALLSERIAL lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding lookup table.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database status ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Map a database ID back to the enum, if known.
            pub fn from_id(id: StatusId) -> Option<Self> {
                match id {
                    $( v if v == $val => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }
    };
}

define_status_enum! {
    /// Booking ledger status (`booking_statuses`).
    BookingStatus {
        /// The vehicle holds its spot.
        Parked = 1,
        /// Released by the owner.
        Completed = 2,
        /// Closed by the expiry sweep.
        Expired = 3,
    }
}

define_status_enum! {
    /// User role (`roles`).
    Role {
        Admin = 1,
        User = 2,
    }
}
