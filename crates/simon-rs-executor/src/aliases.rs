//! Spoken application names mapped to the command each platform launches.

#[cfg(target_os = "windows")]
const APP_ALIASES: &[(&str, &str)] = &[
    ("chrome", "chrome"),
    ("google chrome", "chrome"),
    ("firefox", "firefox"),
    ("edge", "msedge"),
    ("microsoft edge", "msedge"),
    ("word", "winword"),
    ("excel", "excel"),
    ("powerpoint", "powerpnt"),
    ("outlook", "outlook"),
    ("vscode", "code"),
    ("visual studio code", "code"),
    ("vs code", "code"),
    ("notepad", "notepad"),
    ("notepad++", "notepad++"),
    ("terminal", "wt"),
    ("windows terminal", "wt"),
    ("cmd", "cmd"),
    ("powershell", "powershell"),
    ("spotify", "spotify"),
    ("vlc", "vlc"),
    ("explorer", "explorer"),
    ("file explorer", "explorer"),
    ("files", "explorer"),
    ("calculator", "calc"),
    ("calc", "calc"),
    ("settings", "ms-settings:"),
    ("control panel", "control"),
    ("discord", "discord"),
    ("slack", "slack"),
    ("teams", "teams"),
    ("microsoft teams", "teams"),
    ("zoom", "zoom"),
];

#[cfg(target_os = "macos")]
const APP_ALIASES: &[(&str, &str)] = &[
    ("chrome", "Google Chrome"),
    ("google chrome", "Google Chrome"),
    ("firefox", "Firefox"),
    ("edge", "Microsoft Edge"),
    ("microsoft edge", "Microsoft Edge"),
    ("safari", "Safari"),
    ("word", "Microsoft Word"),
    ("excel", "Microsoft Excel"),
    ("powerpoint", "Microsoft PowerPoint"),
    ("outlook", "Microsoft Outlook"),
    ("vscode", "Visual Studio Code"),
    ("visual studio code", "Visual Studio Code"),
    ("vs code", "Visual Studio Code"),
    ("notepad", "TextEdit"),
    ("terminal", "Terminal"),
    ("spotify", "Spotify"),
    ("vlc", "VLC"),
    ("explorer", "Finder"),
    ("file explorer", "Finder"),
    ("files", "Finder"),
    ("finder", "Finder"),
    ("calculator", "Calculator"),
    ("calc", "Calculator"),
    ("settings", "System Settings"),
    ("control panel", "System Settings"),
    ("discord", "Discord"),
    ("slack", "Slack"),
    ("teams", "Microsoft Teams"),
    ("microsoft teams", "Microsoft Teams"),
    ("zoom", "zoom.us"),
];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const APP_ALIASES: &[(&str, &str)] = &[
    ("chrome", "google-chrome"),
    ("google chrome", "google-chrome"),
    ("firefox", "firefox"),
    ("edge", "microsoft-edge"),
    ("microsoft edge", "microsoft-edge"),
    ("word", "libreoffice --writer"),
    ("excel", "libreoffice --calc"),
    ("powerpoint", "libreoffice --impress"),
    ("outlook", "thunderbird"),
    ("vscode", "code"),
    ("visual studio code", "code"),
    ("vs code", "code"),
    ("notepad", "gedit"),
    ("terminal", "x-terminal-emulator"),
    ("spotify", "spotify"),
    ("vlc", "vlc"),
    ("explorer", "nautilus"),
    ("file explorer", "nautilus"),
    ("files", "nautilus"),
    ("calculator", "gnome-calculator"),
    ("calc", "gnome-calculator"),
    ("settings", "gnome-control-center"),
    ("control panel", "gnome-control-center"),
    ("discord", "discord"),
    ("slack", "slack"),
    ("teams", "teams"),
    ("microsoft teams", "teams"),
    ("zoom", "zoom"),
];

/// Launch command for a lowercased spoken app name, if it is a known alias.
pub fn builtin_app_alias(name: &str) -> Option<&'static str> {
    APP_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, command)| *command)
}
