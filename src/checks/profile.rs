use super::{present, Findings};
use crate::types::*;

const C: Category = Category::Profile;

pub const TOP_VOICE_FOLLOWERS: u64 = 500;
pub const RISING_STAR_FOLLOWERS: u64 = 100;

pub fn audit_profile(profile: &Profile, has_profile_readme: bool, findings: &mut Findings) {
    let real_name = profile
        .name
        .as_deref()
        .map(|n| !n.trim().is_empty() && n != profile.login)
        .unwrap_or(false);
    let strategic_bio = profile
        .bio
        .as_deref()
        .map(|b| b.chars().count() > 20)
        .unwrap_or(false);

    findings.push(CheckRecord::core(
        C,
        "Professional avatar",
        present(&profile.avatar_url),
        20,
        "Use a clear, professional and friendly photo.",
    ));
    findings.push(CheckRecord::core(
        C,
        "Real name",
        real_name,
        20,
        "A real name builds more trust than a nickname.",
    ));
    findings.push(CheckRecord::core(
        C,
        "Strategic bio",
        strategic_bio,
        30,
        "Describe your stack, current focus and professional value.",
    ));
    findings.push(CheckRecord::core(
        C,
        "Location",
        present(&profile.location),
        10,
        "Recruiters filter by location and time zone.",
    ));
    findings.push(CheckRecord::core(
        C,
        "Public email",
        present(&profile.email),
        25,
        "Make direct contact easy for recruiters and partners.",
    ));
    findings.push(CheckRecord::core(
        C,
        "Portfolio link",
        present(&profile.blog),
        15,
        "Link to LinkedIn, a portfolio or a personal blog.",
    ));

    findings.push(CheckRecord::bonus(
        C,
        "Hireable status",
        profile.hireable.unwrap_or(false),
        10,
        "State explicitly that you are open to opportunities.",
    ));
    findings.push(
        CheckRecord::bonus(
            C,
            "Company or organization",
            present(&profile.company),
            5,
            "Shows current professional or academic affiliation.",
        )
        .with_impact(Impact::Low),
    );
    findings.push(
        CheckRecord::bonus(
            C,
            "Profile README",
            has_profile_readme,
            40,
            "Create a repository named after your username to customize your profile.",
        )
        .with_impact(Impact::High),
    );
    findings.push(
        CheckRecord::bonus(
            C,
            "Social link",
            present(&profile.twitter_username),
            5,
            "Connect social accounts for social proof.",
        )
        .with_impact(Impact::Low),
    );

    let followers = profile.followers;
    findings.push(
        CheckRecord::bonus(
            C,
            "Influence (top voice)",
            followers > TOP_VOICE_FOLLOWERS,
            50,
            "More than 500 followers: a reference in the community.",
        )
        .with_impact(Impact::High),
    );
    findings.push(CheckRecord::bonus(
        C,
        "Influence (rising star)",
        followers > RISING_STAR_FOLLOWERS && followers <= TOP_VOICE_FOLLOWERS,
        20,
        "More than 100 followers: a growing audience.",
    ));

    if !present(&profile.bio) && !present(&profile.company) && !present(&profile.blog) {
        findings.red_flag("Ghost profile: missing basic information keeps opportunities away.");
    }
}
