use super::model::Platform;
use crate::video::VideoMetadata;

const UNKNOWN_CHANNEL: &str = "YouTube Channel";

struct Template {
    instruction: &'static str,
    example: &'static str,
}

const INSTAGRAM: Template = Template {
    instruction: "Write an Instagram caption for this video. Make it engaging, use emojis strategically, and include 15-20 relevant hashtags at the end. Keep it conversational and authentic. No explanations, just the caption.",
    example: "Just learned this life-changing hip recovery technique! 🤯

If you're dealing with hip pain or just had an injection, save this for later 📌

The key is gentle movement - not complete rest like I thought! Walking actually helps distribute the medication better 🚶‍♀️

Drop a ❤️ if this helped you!

#hiprecovery #healthtips #physiotherapy #jointpain #hippain #wellness #healthylifestyle #painrelief #recovery #physiotherapist #movement #healingjourney #healthadvice #selfcare #injectionrecovery #mobilitywork #painmanagement #healthyliving #fitnessmotivation #wellnessjourney",
};

const YOUTUBE: Template = Template {
    instruction: "Write a YouTube title and description. Title should be catchy and under 100 characters. Description should be engaging, include key points, and have natural keywords. Format as:
TITLE: [your title]
DESCRIPTION: [your description]",
    example: "TITLE: 5 Hip Injection Aftercare Tips Most People Miss! 

DESCRIPTION: Getting a hip injection? Don't make these common recovery mistakes! In this video, I share the essential aftercare tips that can make or break your recovery. From the surprising truth about movement to what you should avoid in the first 48 hours - this guide covers everything you need for a smooth recovery. Whether it's your first injection or you're looking to improve your aftercare routine, these evidence-based tips will help you heal faster and more effectively. Remember to always consult with your healthcare provider for personalized advice!",
};

const TIKTOK: Template = Template {
    instruction: "Write a TikTok caption. Make it trendy, punchy, and under 150 characters with 5-7 hashtags. Use Gen-Z language naturally. No explanations, just the caption.",
    example: "POV: you finally find aftercare tips that actually work 😭✨ #hipinjection #recoverymode #healthtok #injectiontips #painrelief #fypシ",
};

const LINKEDIN: Template = Template {
    instruction: "Write a LinkedIn post. Professional but personable tone. Share insights, add value, and end with a thought-provoking question. No explanations, just the post.",
    example: "Had an interesting conversation with a patient today about hip injection aftercare.

It's surprising how many people think complete rest is the answer. In reality, gentle movement is often more beneficial for recovery - it helps distribute the medication and prevents stiffness.

Here are the top 5 things I recommend:
→ Light walking within 24 hours
→ Ice for 20 minutes every few hours
→ Avoid high-impact activities for 48-72 hours
→ Stay hydrated to help your body process the medication
→ Listen to your body - some discomfort is normal, severe pain isn't

The medical field is constantly evolving, and patient education remains one of our most powerful tools.

What's one piece of medical advice that surprised you when you first learned it?

#Healthcare #PatientCare #MedicalEducation #Physiotherapy #HealthAndWellness",
};

fn template(platform: Platform) -> &'static Template {
    match platform {
        Platform::Instagram => &INSTAGRAM,
        Platform::Youtube => &YOUTUBE,
        Platform::Tiktok => &TIKTOK,
        Platform::Linkedin => &LINKEDIN,
    }
}

/// Build the completion prompt for one video. Pure: no I/O, same input, same output.
pub fn build_prompt(platform: Platform, video: &VideoMetadata) -> String {
    let template = template(platform);
    let channel = video
        .channel_name
        .as_deref()
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_CHANNEL);
    let kind = if video.is_short {
        "YouTube Short"
    } else {
        "YouTube Video"
    };

    format!(
        "{instruction}\n\nVideo Title: {title}\nChannel: {channel}\nType: {kind}\n\nExample of the style I want:\n{example}\n\nNow write a caption for this video:",
        instruction = template.instruction,
        title = video.title,
        channel = channel,
        kind = kind,
        example = template.example,
    )
}
