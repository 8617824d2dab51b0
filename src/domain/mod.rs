mod birth_date;
mod new_subscriber;
mod reading_set;
mod subscriber_email;
mod subscriber_name;
mod zodiac_sign;

pub use birth_date::{BirthDate, InvalidInputError};
pub use new_subscriber::NewSubscriber;
pub use reading_set::ReadingSet;
pub use subscriber_email::SubscriberEmail;
pub use subscriber_name::SubscriberName;
pub use zodiac_sign::{classify, ZodiacSign};
