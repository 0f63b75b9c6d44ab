//! Small built-in dataset used when catalogue or course files are missing

use crate::catalogue::course::{Course, CourseLevel};
use crate::catalogue::occupation::{Occupation, OccupationRecord};
use log::warn;

#[allow(clippy::too_many_arguments)]
fn occupation(
    code: &str,
    title: &str,
    description: &str,
    zone: u8,
    demand: &str,
    automation_risk: Option<f32>,
    median_wage: Option<f32>,
    skill_levels: [f32; 20],
) -> OccupationRecord {
    OccupationRecord {
        code: code.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        zone,
        skill_levels: skill_levels.to_vec(),
        demand: Some(demand.to_string()),
        automation_risk,
        median_wage,
    }
}

fn demo_records() -> Vec<OccupationRecord> {
    vec![
        occupation(
            "15-1252.00", "Software Developers",
            "Research, design, and develop computer applications and software systems",
            4, "High", Some(20.0), Some(120_730.0),
            [4.0, 3.6, 3.5, 3.4, 2.0, 4.1, 3.9, 2.9, 3.1, 2.6, 2.5, 2.8, 3.0, 4.1, 4.6, 4.0, 3.0, 3.1, 1.2, 3.8],
        ),
        occupation(
            "15-1211.00", "Computer Systems Analysts",
            "Analyze data processing problems to improve computer systems for organizations",
            4, "Medium", Some(35.0), Some(99_270.0),
            [4.0, 3.8, 3.8, 3.3, 2.2, 4.0, 3.8, 3.1, 3.3, 3.0, 2.8, 3.0, 3.1, 4.0, 3.0, 4.2, 3.2, 3.0, 1.0, 3.9],
        ),
        occupation(
            "15-2051.00", "Data Scientists",
            "Develop and implement methods to analyze data using statistics, machine learning and python",
            5, "High", None, Some(103_500.0),
            [4.2, 3.9, 3.6, 4.6, 3.5, 4.2, 4.0, 2.8, 2.9, 2.7, 2.3, 2.9, 2.6, 4.1, 4.0, 3.9, 2.8, 3.0, 0.8, 3.9],
        ),
        occupation(
            "29-1141.00", "Registered Nurses",
            "Assess patient health problems and needs, and provide nursing care in hospitals and clinics",
            3, "High", Some(10.0), Some(81_220.0),
            [3.9, 3.5, 3.9, 2.6, 3.3, 4.0, 3.6, 4.3, 4.0, 3.0, 2.9, 3.8, 4.3, 3.8, 0.5, 2.6, 4.0, 3.1, 1.2, 3.9],
        ),
        occupation(
            "29-9021.00", "Health Information Technologists",
            "Apply healthcare technology and data analysis to manage patient health records and clinical data systems",
            4, "High", None, Some(62_990.0),
            [3.9, 3.6, 3.4, 3.0, 2.4, 3.8, 3.5, 2.9, 3.1, 2.6, 2.4, 2.9, 3.1, 3.5, 2.8, 3.6, 3.0, 3.4, 0.8, 3.5],
        ),
        occupation(
            "29-2010.00", "Clinical Laboratory Technologists",
            "Perform medical laboratory tests for diagnosis and treatment of disease",
            3, "Medium", Some(47.0), Some(57_380.0),
            [3.6, 3.0, 3.0, 3.1, 4.0, 3.7, 3.4, 2.4, 2.7, 2.0, 1.8, 2.5, 2.8, 3.3, 1.0, 2.5, 3.8, 4.1, 2.7, 3.5],
        ),
        occupation(
            "43-9021.00", "Data Entry Keyers",
            "Operate data entry devices to input lists, records and other data into computer systems",
            2, "Declining", Some(99.0), Some(37_790.0),
            [3.0, 2.4, 2.5, 2.0, 0.5, 2.5, 2.0, 1.9, 2.2, 1.3, 1.2, 1.5, 2.3, 2.0, 0.3, 1.3, 2.6, 2.9, 0.6, 2.1],
        ),
        occupation(
            "25-2031.00", "Secondary School Teachers",
            "Teach students in one or more subjects at the secondary school level",
            4, "Medium", Some(17.0), Some(65_220.0),
            [4.0, 3.8, 4.3, 2.8, 2.6, 3.9, 3.8, 4.0, 3.6, 3.5, 3.0, 4.4, 3.6, 3.5, 0.9, 2.3, 2.2, 2.1, 0.7, 3.7],
        ),
        occupation(
            "13-2011.00", "Accountants and Auditors",
            "Examine, analyze, and interpret accounting records and financial statements",
            4, "Medium", Some(94.0), Some(79_880.0),
            [4.2, 3.7, 3.5, 4.0, 1.5, 4.0, 3.6, 2.8, 2.9, 2.8, 2.6, 2.7, 3.0, 3.6, 1.2, 3.3, 2.9, 3.2, 0.5, 3.9],
        ),
        occupation(
            "17-2051.00", "Civil Engineers",
            "Plan, design, and oversee construction of infrastructure such as roads, bridges and water systems",
            4, "Medium", Some(2.0), Some(89_940.0),
            [4.1, 3.9, 3.8, 4.2, 3.7, 4.1, 3.9, 3.0, 3.5, 3.0, 2.9, 3.1, 2.8, 4.2, 1.5, 3.6, 3.2, 3.4, 1.5, 4.0],
        ),
        occupation(
            "41-2031.00", "Retail Salespersons",
            "Sell merchandise and provide customer service in retail stores",
            2, "Slower than average", Some(92.0), Some(31_920.0),
            [2.9, 2.3, 3.6, 2.4, 0.8, 3.0, 2.6, 3.4, 2.9, 3.8, 3.0, 2.6, 4.0, 2.8, 0.2, 1.7, 2.4, 2.3, 0.9, 2.9],
        ),
        occupation(
            "11-9111.00", "Medical and Health Services Managers",
            "Plan, direct, and coordinate medical and health services in hospitals and clinics",
            5, "High", Some(25.0), Some(110_680.0),
            [4.2, 4.0, 4.1, 3.1, 2.6, 4.1, 3.9, 3.9, 4.0, 3.8, 3.6, 3.5, 3.7, 4.0, 1.0, 3.6, 3.2, 3.0, 0.7, 4.2],
        ),
        occupation(
            "49-3023.00", "Automotive Service Technicians",
            "Diagnose, adjust, repair, and overhaul automotive vehicles",
            3, "Average", Some(59.0), Some(46_970.0),
            [3.1, 2.3, 2.8, 2.5, 2.2, 3.3, 2.8, 2.3, 2.6, 2.0, 1.8, 2.3, 2.9, 3.3, 0.6, 2.5, 3.5, 3.6, 4.5, 3.2],
        ),
        occupation(
            "27-1024.00", "Graphic Designers",
            "Design and create graphics for print and digital media, branding and marketing",
            4, "Little or no change", Some(8.0), Some(57_990.0),
            [3.5, 3.4, 3.5, 2.1, 1.1, 3.6, 3.5, 3.3, 3.2, 3.1, 2.6, 2.6, 3.2, 3.4, 1.8, 2.2, 2.0, 2.9, 0.6, 3.5],
        ),
    ]
}

/// Built-in occupation catalogue.
pub fn demo_occupations() -> Vec<Occupation> {
    demo_records()
        .into_iter()
        .filter_map(|record| match Occupation::try_from(record) {
            Ok(occupation) => Some(occupation),
            Err(issue) => {
                warn!("Built-in occupation rejected: {}", issue);
                None
            }
        })
        .collect()
}

#[allow(clippy::too_many_arguments)]
fn course(
    title: &str,
    platform: &str,
    subject: &str,
    skills_covered: &str,
    level: CourseLevel,
    quality_score: f32,
    is_free: bool,
    duration_hours: Option<f32>,
    url: &str,
) -> Course {
    Course {
        id: format!("{}|{}", title.to_lowercase(), platform.to_lowercase()),
        title: title.to_string(),
        platform: platform.to_string(),
        subject: subject.to_string(),
        skills_covered: skills_covered.to_string(),
        level,
        quality_score: Some(quality_score),
        is_free,
        duration_hours,
        url: Some(url.to_string()),
    }
}

/// Built-in course corpus.
pub fn demo_courses() -> Vec<Course> {
    use CourseLevel::{Advanced, Foundation, Intermediate};

    vec![
        course("Python for Data Science", "Coursera", "programming", "python programming coding data analysis", Foundation, 0.9, false, Some(30.0), "https://www.coursera.org"),
        course("Software Engineering Practices", "edX", "programming", "software development programming testing code review", Intermediate, 0.85, true, Some(45.0), "https://www.edx.org"),
        course("Advanced Algorithms and Systems Programming", "Udacity", "programming", "programming algorithms systems design", Advanced, 0.8, false, Some(60.0), "https://www.udacity.com"),
        course("Statistics and Probability Essentials", "Khan Academy", "mathematics", "mathematics statistics probability calculation", Foundation, 0.88, true, Some(25.0), "https://www.khanacademy.org"),
        course("Applied Statistics for Analysts", "Coursera", "mathematics", "statistics regression mathematics data analysis", Intermediate, 0.86, false, Some(40.0), "https://www.coursera.org"),
        course("Machine Learning Specialisation", "Coursera", "machine learning", "machine learning mathematics statistics python", Advanced, 0.95, false, Some(60.0), "https://www.coursera.org"),
        course("Critical Thinking and Problem Solving", "edX", "thinking", "critical thinking logic reasoning complex problem solving", Foundation, 0.8, true, Some(12.0), "https://www.edx.org"),
        course("Decision Making for Managers", "LinkedIn Learning", "management", "judgment decision making leadership coordination", Intermediate, 0.75, false, None, "https://www.linkedin.com/learning"),
        course("Systems Analysis and Design", "Coursera", "information systems", "systems analysis requirements data systems design", Intermediate, 0.82, false, Some(35.0), "https://www.coursera.org"),
        course("Business Writing Fundamentals", "Alison", "communication", "writing reports documentation communication", Foundation, 0.7, true, Some(8.0), "https://alison.com"),
        course("Public Speaking and Presentation", "Udemy", "communication", "speaking presentation public speaking communication", Foundation, 0.72, false, Some(6.0), "https://www.udemy.com"),
        course("Empathy and Patient Communication", "FutureLearn", "healthcare", "social perceptiveness empathy patient care communication", Foundation, 0.78, true, Some(10.0), "https://www.futurelearn.com"),
        course("Teamwork and Collaboration at Work", "Coursera", "professional skills", "coordination teamwork collaboration leadership", Foundation, 0.74, true, Some(9.0), "https://www.coursera.org"),
        course("Negotiation Mastery", "edX", "business", "negotiation persuasion conflict resolution", Intermediate, 0.83, false, Some(20.0), "https://www.edx.org"),
        course("Sales and Persuasion Techniques", "Udemy", "sales", "persuasion sales marketing influence", Foundation, 0.65, false, Some(7.0), "https://www.udemy.com"),
        course("Teaching and Mentoring Skills", "FutureLearn", "education", "instructing teaching training mentoring", Intermediate, 0.76, true, Some(15.0), "https://www.futurelearn.com"),
        course("Customer Service Excellence", "Alison", "service", "service orientation customer service helping people", Foundation, 0.69, true, Some(5.0), "https://alison.com"),
        course("Quality Control and Inspection", "Coursera", "operations", "quality control analysis testing inspection", Intermediate, 0.77, false, Some(18.0), "https://www.coursera.org"),
        course("Operations Monitoring for Technicians", "edX", "operations", "operations monitoring process control indicators", Foundation, 0.7, true, None, "https://www.edx.org"),
        course("Equipment Maintenance and Repair", "Alison", "technical", "equipment maintenance repair troubleshooting", Foundation, 0.66, true, Some(14.0), "https://alison.com"),
        course("Scientific Methods and Laboratory Practice", "Coursera", "science", "science biology chemistry laboratory methods", Foundation, 0.81, false, Some(22.0), "https://www.coursera.org"),
        course("Health Informatics and Clinical Data", "Coursera", "healthcare technology", "health informatics clinical data systems analysis healthcare technology", Advanced, 0.9, false, Some(40.0), "https://www.coursera.org"),
        course("Reading and Research Skills", "OpenLearn", "study skills", "reading comprehension active learning research", Foundation, 0.68, true, Some(6.0), "https://www.open.edu/openlearn"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalogue_is_fully_consistent() {
        assert_eq!(demo_occupations().len(), demo_records().len());
    }

    #[test]
    fn test_demo_courses_have_unique_identity() {
        let courses = demo_courses();
        let mut ids: Vec<&str> = courses.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), courses.len());
    }
}
