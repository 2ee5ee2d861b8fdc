//! Per-type email rendering.
//!
//! `subject` and `content` are the short lines persisted on the
//! notification record; `body` is the full message handed to the email
//! collaborator.

use messaging::{BookingNotification, BookingOutcomeStatus, EventNotification, UserNotification};

/// A rendered email plus the record fields derived from it.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub subject: String,
    pub content: String,
    pub body: String,
}

/// Renders a booking confirmation or cancellation email.
pub fn booking(message: &BookingNotification) -> Rendered {
    match message.status {
        BookingOutcomeStatus::Confirmed => Rendered {
            subject: "Your Booking is Confirmed!".to_string(),
            content: format!("Your booking for {} has been confirmed.", message.event_title),
            body: format!(
                "Dear Customer,\n\n\
                 Your booking for {title} has been confirmed!\n\n\
                 Booking details:\n\
                 - Event: {title}\n\
                 - Tickets: {tickets}\n\
                 - Booking ID: {booking_id}\n\n\
                 Thank you for your purchase.\n\n\
                 Best regards,\nEvent Booking Team",
                title = message.event_title,
                tickets = message.tickets,
                booking_id = message.booking_id,
            ),
        },
        BookingOutcomeStatus::Cancelled => Rendered {
            subject: "Booking Cancellation".to_string(),
            content: format!("Your booking for {} has been cancelled.", message.event_title),
            body: format!(
                "Dear Customer,\n\n\
                 Your booking for {title} has been cancelled as requested.\n\n\
                 Booking details:\n\
                 - Event: {title}\n\
                 - Booking ID: {booking_id}\n\n\
                 If you did not request this cancellation, please contact our\n\
                 support team immediately.\n\n\
                 Best regards,\nEvent Booking Team",
                title = message.event_title,
                booking_id = message.booking_id,
            ),
        },
    }
}

/// Renders a user registration welcome email.
pub fn user(message: &UserNotification) -> Rendered {
    Rendered {
        subject: "Welcome to Event Booking Platform".to_string(),
        content: "Thank you for registering with our platform.".to_string(),
        body: format!(
            "Dear {name},\n\n\
             Thank you for registering with our event booking platform.\n\
             Your account has been successfully created and you can now\n\
             browse and book events.\n\n\
             Account email: {email}\n\n\
             If you didn't create this account, please contact our support\n\
             team immediately.\n\n\
             Best regards,\nEvent Booking Team",
            name = message.name,
            email = message.email,
        ),
    }
}

/// Renders an event update email.
pub fn event(message: &EventNotification) -> Rendered {
    let update = message
        .message
        .clone()
        .unwrap_or_else(|| "The event details have been updated.".to_string());
    Rendered {
        subject: format!("Event Update: {}", message.event_title),
        content: update.clone(),
        body: format!(
            "Dear Customer,\n\n\
             We're writing to inform you about an update to an event you're\n\
             attending.\n\n\
             - Event: {title}\n\
             - Update: {update}\n\n\
             Thank you for your understanding.\n\n\
             Best regards,\nEvent Booking Team",
            title = message.event_title,
        ),
    }
}
