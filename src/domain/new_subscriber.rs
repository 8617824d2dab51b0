use crate::domain::{SubscriberEmail, SubscriberName, ZodiacSign};

/// A validated registration, ready to be sent to the reading service.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub name: SubscriberName,
    pub email: SubscriberEmail,
    pub zodiac_sign: ZodiacSign,
}
