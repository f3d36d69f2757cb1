// Version-fixed template files emitted by `setup`.
// These are byte-exact contracts: tooling and tests compare against
// them verbatim, so edits here are releases, not tweaks.

pub const GITIGNORE: &str = "\
# Environment and secrets
.env
.env.backup.*
credentials.json
.devops-agent/

# Build artifacts
target/
dist/
build/

# Editor state
.vscode/
.idea/
*.swp

# OS metadata
.DS_Store
Thumbs.db
";

pub const ENV_EXAMPLE: &str = "\
# Copy to .env and fill in, or run: devops-agent wizard

# Meta WhatsApp Business API
META_ACCESS_TOKEN=
META_APP_SECRET=
META_VERIFY_TOKEN=
META_PHONE_NUMBER_ID=

# Google OAuth (Calendar, Gmail)
GOOGLE_CLIENT_ID=
GOOGLE_CLIENT_SECRET=

# Microsoft OAuth (Outlook Calendar)
MICROSOFT_CLIENT_ID=
MICROSOFT_CLIENT_SECRET=

# n8n automation platform
N8N_BASE_URL=
N8N_API_KEY=

# Render deployment
RENDER_API_KEY=

# GitHub
GITHUB_TOKEN=
GITHUB_USERNAME=
GITHUB_REPO=
";

pub const README: &str = "\
# DevOps Automation Agent

Automation toolkit around a WhatsApp Business webhook: environment
wizard, credential vault, GitHub auto-push and a deployable webhook
server.

## Quick start

```
devops-agent setup      # scaffold this workspace
devops-agent wizard     # build your .env interactively
devops-agent serve      # run the webhook server
```

Register `https://<your-host>/webhook` in the Meta developer dashboard
with the verify token from your .env.

## Features

- WhatsApp Business webhook with signature verification and auto-replies
- Interactive credential wizard with vault prefill and .env backups
- One-command GitHub commit + push with API verification
- Credential health checks against the live APIs
- Activity log and dashboard

## Cost notes

- Meta WhatsApp Business API: the first 1,000 service conversations
  per month are free
- Render: the free web service tier is enough for the webhook
- GitHub: free for public and private repositories
";

pub const PROCFILE: &str = "web: devops-agent serve\n";

/// File name / content pairs, in emission order
pub const TEMPLATES: [(&str, &str); 4] = [
    (".gitignore", GITIGNORE),
    (".env.example", ENV_EXAMPLE),
    ("README.md", README),
    ("Procfile", PROCFILE),
];
