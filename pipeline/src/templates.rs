//! Template replies used for button clicks and whenever the completion service is unavailable.

use std::fmt::Write;

use analyzer::Tokens;
use prompt::SUPPORT_CONTACT;

use crate::input::ButtonAction;
use crate::topic::Topic;

struct Program {
    name: &'static str,
    code: &'static str,
    duration: &'static str,
    language: &'static str,
}

const fn program(
    name: &'static str,
    code: &'static str,
    duration: &'static str,
    language: &'static str,
) -> Program {
    Program {
        name,
        code,
        duration,
        language,
    }
}

const BACHELOR_PROGRAMS: &[Program] = &[
    program("Business Administration", "BWL", "7 semesters", "German/English"),
    program("International Management", "IM", "7 semesters", "English"),
    program("Digital Business Management", "DBM", "7 semesters", "German"),
    program("Marketing Management", "MM", "7 semesters", "German"),
    program("Logistics Management", "LM", "7 semesters", "German"),
    program("Information Management", "INM", "7 semesters", "German"),
    program("Industrial Engineering", "WI", "7 semesters", "German"),
    program("Mechanical Engineering", "MB", "7 semesters", "German"),
    program("Medical Engineering", "MT", "7 semesters", "German"),
    program("Healthcare Management", "GM", "7 semesters", "German"),
    program("Social Work", "SA", "7 semesters", "German"),
    program("Digital Health Management", "DHM", "7 semesters", "German"),
    program("Public Management", "PM", "6 semesters", "German"),
    program("Tax and Audit", "STP", "6 semesters", "German"),
    program("Applied Computer Science", "AI", "7 semesters", "German"),
];

const MASTER_PROGRAMS: &[Program] = &[
    program("Business Administration", "MBA", "3 semesters", "German/English"),
    program("International Management", "MIM", "3 semesters", "English"),
    program("Digital Enterprise Management", "DEM", "3 semesters", "German"),
    program("Information Management", "MINM", "3 semesters", "German"),
    program("Systems Engineering", "MSE", "3 semesters", "German"),
    program("Medical Engineering", "MMT", "3 semesters", "German"),
    program("Healthcare Management", "MHM", "3 semesters", "German"),
    program("Public Administration", "MPA", "4 semesters", "German"),
];

const BACHELOR_URL: &str = "https://www.hnu.de/studium/bachelor";
const MASTER_URL: &str = "https://www.hnu.de/studium/master";
const APPLICATION_URL: &str = "https://www.hnu.de/bewerbung";

const COUNT_WORDS: &[&str] = &["how many", "anzahl", "total", "alle", "all"];
const LIST_WORDS: &[&str] = &["names", "list", "liste", "which", "welche"];
const IT_WORDS: &[&str] = &[
    "it support",
    "computer",
    "laptop",
    "password",
    "vpn",
    "network",
    "wifi",
    "email",
];

fn program_list(programs: &[Program], with_details: bool) -> String {
    let mut out = String::new();
    for (i, p) in programs.iter().enumerate() {
        let _ = write!(out, "\n{}. {} ({})", i + 1, p.name, p.code);
        if with_details {
            let _ = write!(out, " - {}, taught in {}", p.duration, p.language);
        }
    }
    out
}

fn bachelor_response(tokens: &Tokens) -> String {
    let total = BACHELOR_PROGRAMS.len();
    if tokens.any_match(COUNT_WORDS) {
        return format!(
            "HNU offers {} bachelor's degree programs:{}\n\nDetails: {}\nApplication: {}",
            total,
            program_list(BACHELOR_PROGRAMS, true),
            BACHELOR_URL,
            APPLICATION_URL
        );
    }
    if tokens.any_match(LIST_WORDS) {
        return format!(
            "Bachelor programs at HNU:{}\n\nDetails: {}",
            program_list(BACHELOR_PROGRAMS, false),
            BACHELOR_URL
        );
    }
    format!(
        "HNU offers {} bachelor programs across Business, Engineering, Information Technology \
         and Health Sciences. What would you like to know?",
        total
    )
}

fn master_response(tokens: &Tokens) -> String {
    let total = MASTER_PROGRAMS.len();
    if tokens.any_match(COUNT_WORDS) || tokens.any_match(LIST_WORDS) {
        return format!(
            "HNU offers {} master's degree programs:{}\n\nDetails: {}",
            total,
            program_list(MASTER_PROGRAMS, true),
            MASTER_URL
        );
    }
    format!(
        "HNU offers {} master programs for advanced studies. Would you like to see the \
         complete list or learn about a specific program?",
        total
    )
}

fn employee_response(tokens: &Tokens) -> String {
    if tokens.any_match(IT_WORDS) {
        return "IT Support for Employees\n\
                Services: hardware issues, software installation, network problems, email configuration.\n\
                Contact: it@hnu.de | +49 731 9762-1234\n\
                Support tickets: https://helpdesk.hnu.de"
            .to_string();
    }
    if tokens.any_match(&["room", "booking", "book", "meeting", "reserve"]) {
        return "Room Booking & Facilities\n\
                Services: room booking, equipment requests, maintenance, event planning.\n\
                Contact: facilities@hnu.de | +49 731 9762-3000\n\
                Booking system: https://rooms.hnu.de"
            .to_string();
    }
    if tokens.any_match(&["hr", "payroll", "benefits", "leave", "vacation"]) {
        return "Human Resources\n\
                Services: payroll, benefits, leave management, training.\n\
                Contact: hr@hnu.de | +49 731 9762-2000"
            .to_string();
    }
    "Employee services at HNU: IT support, room booking and facilities, HR and payroll. \
     Which service do you need help with?"
        .to_string()
}

fn student_response(tokens: &Tokens) -> String {
    if tokens.any_match(&["enrol*", "register*", "course*", "einschreib*"]) {
        return "Course Enrollment & Academic Services\n\
                Services: course enrollment, transcripts, certificates, academic records.\n\
                Contact: student@hnu.de | +49 731 9762-1500\n\
                Student portal: https://portal.hnu.de"
            .to_string();
    }
    if tokens.any_match(&["library", "books", "research", "bibliothek"]) {
        return "Library Services\n\
                Services: book loans, research support, study spaces, digital resources.\n\
                Contact: library@hnu.de | +49 731 9762-1700\n\
                Opening hours: Mon-Fri 8:00-20:00, Sat 9:00-16:00"
            .to_string();
    }
    "Student services at HNU: enrollment and academic affairs, counseling and support, \
     library and research resources. What do you need help with today?"
        .to_string()
}

fn partnership_response() -> String {
    format!(
        "Thank you for your interest in working with HNU. We offer partnerships in research, \
         sponsorship, events and facility rental. Write to {} and the right team will get back to you.",
        SUPPORT_CONTACT
    )
}

fn general_response(has_greeting: bool) -> String {
    if has_greeting {
        return "Hello! I'm your HNU support assistant. I can help with bachelor and master \
                programs, employee services (IT, HR, facilities), student services (enrollment, \
                library) and partnership opportunities. How can I assist you today?"
            .to_string();
    }
    "I'm here to help with information about HNU services. You can ask about programs, \
     services or any other university-related topic. What would you like to know?"
        .to_string()
}

/// Reply for `text` on `topic` without the completion service. Never empty.
pub fn topic_response(topic: Topic, text: &str, has_greeting: bool) -> String {
    let tokens = Tokens::new(text);
    match topic {
        Topic::BachelorPrograms => bachelor_response(&tokens),
        Topic::MasterPrograms => master_response(&tokens),
        Topic::EmployeeServices => employee_response(&tokens),
        Topic::StudentServices => student_response(&tokens),
        Topic::Partnership => partnership_response(),
        Topic::General => general_response(has_greeting),
    }
}

/// Reply to a button click on `topic`.
pub fn button_response(action: &ButtonAction, topic: Topic) -> String {
    match action {
        ButtonAction::ShowAllPrograms if topic == Topic::MasterPrograms => format!(
            "All master programs:{}",
            program_list(MASTER_PROGRAMS, false)
        ),
        ButtonAction::ShowAllPrograms => format!(
            "All bachelor programs:{}",
            program_list(BACHELOR_PROGRAMS, false)
        ),
        ButtonAction::ApplicationInfo => format!(
            "Steps to apply:\n1. Visit the HNU application portal\n2. Create your account\n\
             3. Submit the required documents\n4. Pay the application fee (if applicable)\n\
             5. Wait for the admission decision\n\nPortal: {}\nQuestions: admissions@hnu.de",
            APPLICATION_URL
        ),
        ButtonAction::ContactInfo => format!(
            "HNU contacts:\nMain office: {} | +49 731 9762-0\n\
             Student services: student@hnu.de | +49 731 9762-1500\n\
             IT support: it@hnu.de | +49 731 9762-1234",
            SUPPORT_CONTACT
        ),
        ButtonAction::PrerequisitesInfo => format!(
            "Master programs require a completed bachelor's degree in a related field; some \
             programs ask for work experience or language certificates. Details: {}",
            MASTER_URL
        ),
        ButtonAction::MoreDetails => "I'd be happy to provide more details! Please let me know \
             specifically what you'd like to know more about."
            .to_string(),
        ButtonAction::ContinueTopic => "Great! Please continue with your questions about this \
             topic. What else would you like to know?"
            .to_string(),
        ButtonAction::ChangeTopic => {
            "Topic changed. What would you like to know about now?".to_string()
        }
        ButtonAction::Other(_) => "I understand. How else can I help you today?".to_string(),
    }
}

/// Reply used when the turn itself could not be processed.
pub fn error_response() -> String {
    format!(
        "I apologize, but I encountered an error processing your request. Please contact our \
         support team at {} for assistance.",
        SUPPORT_CONTACT
    )
}
