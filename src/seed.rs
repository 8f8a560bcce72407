//! Demo catalog the process starts with.

use crate::model::{Course, Lesson, Module, Review, User, UserRole};

pub const DEMO_STUDENT_ID: &str = "3";

fn lesson(id: &str, title: &str, duration: &str) -> Lesson {
    Lesson {
        id: id.to_string(),
        title: title.to_string(),
        duration: duration.to_string(),
        video_url: None,
        content: None,
    }
}

fn module(id: &str, title: &str, lessons: Vec<Lesson>) -> Module {
    Module {
        id: id.to_string(),
        title: title.to_string(),
        lessons,
    }
}

fn strings(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

pub fn demo_users() -> Vec<User> {
    vec![
        User {
            id: "1".into(),
            name: "Admin User".into(),
            email: "admin@edupro.ai".into(),
            role: UserRole::Admin,
            avatar: "https://picsum.photos/seed/admin/200".into(),
            bio: None,
            is_verified: None,
            completed_course_ids: Vec::new(),
            enrolled_course_ids: Vec::new(),
            completed_lesson_ids: Vec::new(),
        },
        User {
            id: "2".into(),
            name: "Sarah Johnson".into(),
            email: "sarah.j@edupro.ai".into(),
            role: UserRole::Instructor,
            avatar: "https://picsum.photos/seed/instructor1/200".into(),
            bio: Some("Senior Full Stack Developer with 10 years of experience.".into()),
            is_verified: Some(true),
            completed_course_ids: Vec::new(),
            enrolled_course_ids: Vec::new(),
            completed_lesson_ids: Vec::new(),
        },
        User {
            id: DEMO_STUDENT_ID.into(),
            name: "Alex Chen".into(),
            email: "alex.student@gmail.com".into(),
            role: UserRole::Student,
            avatar: "https://picsum.photos/seed/student/200".into(),
            bio: None,
            is_verified: None,
            completed_course_ids: strings(&["c2"]),
            enrolled_course_ids: strings(&["c1", "c2", "c3"]),
            completed_lesson_ids: strings(&["l1"]),
        },
    ]
}

pub fn demo_courses() -> Vec<Course> {
    vec![
        Course {
            id: "c1".into(),
            title: "Advanced React Architecture".into(),
            description:
                "Learn to build scalable enterprise applications with React 18 and Next.js.".into(),
            instructor_id: "2".into(),
            instructor_name: "Sarah Johnson".into(),
            price: 49.99,
            thumbnail: "https://picsum.photos/seed/react/800/450".into(),
            category: "Development".into(),
            rating: 4.8,
            students_count: 1240,
            duration: "12h 30m".into(),
            modules: vec![
                module(
                    "m1",
                    "Introduction to Architecture",
                    vec![
                        lesson("l1", "Why Architecture Matters", "10:00"),
                        lesson("l2", "Project Structure", "15:20"),
                    ],
                ),
                module(
                    "m2",
                    "Advanced Patterns",
                    vec![
                        lesson("l3", "HOC vs Hooks", "20:00"),
                        lesson("l4", "Compound Components", "18:10"),
                    ],
                ),
            ],
            reviews: vec![Review {
                id: "r1".into(),
                user_id: DEMO_STUDENT_ID.into(),
                user_name: "Alex Chen".into(),
                user_avatar: "https://picsum.photos/seed/student/200".into(),
                rating: 5,
                comment:
                    "Absolutely phenomenal course. The architecture patterns are industry standard."
                        .into(),
                date: "2024-03-15".into(),
            }],
        },
        Course {
            id: "c2".into(),
            title: "Modern UI/UX Design Fundamentals".into(),
            description: "Master Figma and design principles for the modern web.".into(),
            instructor_id: "2".into(),
            instructor_name: "Sarah Johnson".into(),
            price: 29.99,
            thumbnail: "https://picsum.photos/seed/design/800/450".into(),
            category: "Design".into(),
            rating: 4.9,
            students_count: 850,
            duration: "8h 45m".into(),
            modules: vec![module(
                "m1",
                "Design Thinking",
                vec![lesson("ld1", "Intro to UX", "12:00")],
            )],
            reviews: Vec::new(),
        },
        Course {
            id: "c3".into(),
            title: "Full Stack Development with AI".into(),
            description:
                "Harness the power of LLMs like Gemini to speed up your development workflow."
                    .into(),
            instructor_id: "2".into(),
            instructor_name: "Sarah Johnson".into(),
            price: 79.99,
            thumbnail: "https://picsum.photos/seed/ai/800/450".into(),
            category: "Development".into(),
            rating: 5.0,
            students_count: 3200,
            duration: "20h 15m".into(),
            modules: vec![module(
                "m1",
                "AI Basics",
                vec![
                    lesson("la1", "What is an LLM?", "05:00"),
                    lesson("la2", "Prompt Engineering", "15:00"),
                ],
            )],
            reviews: Vec::new(),
        },
    ]
}
